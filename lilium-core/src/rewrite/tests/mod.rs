mod rewriter_tests;

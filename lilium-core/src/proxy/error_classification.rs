/// Coarse cause of a failed upstream exchange, used in logs and error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    Connect,
    Tls,
    Protocol,
    Timeout,
    Reset,
    Unknown,
}

impl TransportFailure {
    pub const fn as_str(self) -> &'static str {
        match self {
            TransportFailure::Connect => "connect",
            TransportFailure::Tls => "tls",
            TransportFailure::Protocol => "protocol",
            TransportFailure::Timeout => "timeout",
            TransportFailure::Reset => "reset",
            TransportFailure::Unknown => "unknown",
        }
    }
}

pub fn classify_pingora_error(err: &pingora::Error) -> TransportFailure {
    use pingora::{ErrorSource, ErrorType::*};

    // Downstream and internal errors say nothing about the upstream.
    if err.esource() != &ErrorSource::Upstream {
        return TransportFailure::Unknown;
    }

    match err.etype() {
        // Connect phase.
        ConnectTimedout | ConnectRefused | ConnectNoRoute | ConnectProxyFailure | ConnectError => {
            TransportFailure::Connect
        }

        // TLS / handshake.
        TLSHandshakeFailure | TLSHandshakeTimedout | TLSWantX509Lookup | InvalidCert
        | HandshakeError => TransportFailure::Tls,

        // Protocol.
        InvalidHTTPHeader | H1Error | H2Error | InvalidH2 | H2Downgrade => {
            TransportFailure::Protocol
        }

        // Established connection IO.
        ReadTimedout | WriteTimedout => TransportFailure::Timeout,

        ReadError | WriteError | ConnectionClosed => TransportFailure::Reset,

        _ => TransportFailure::Unknown,
    }
}

// Path: crates/ledger-client-core/src/error.rs
//! Error taxonomy for the client. Each concern gets its own `thiserror` enum
//! rather than one flat error type, following the kernel's convention of
//! scoping errors to the component that raises them.

use thiserror::Error;

/// Assigns a stable, machine-readable string to an error variant so callers
/// (including FFI boundaries) can match on a tag that survives refactors of
/// the Rust enum itself.
pub trait ErrorCode {
    /// The unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors raised by the Wire Codec (field encode/decode, stream framing).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The reader encountered a wire type it does not know how to skip or parse.
    #[error("unsupported wire type {0}")]
    UnsupportedWireType(u8),
    /// The input ended before a field or varint could be fully read.
    #[error("unexpected end of input")]
    UnexpectedEnd,
    /// A varint continued past the maximum of 10 bytes.
    #[error("varint exceeds maximum length")]
    VarintOverflow,
    /// The stream frame flag byte was neither a data frame nor a trailer frame marker.
    #[error("invalid frame flag {0}")]
    InvalidFrameFlag(u8),
    /// A length-delimited field expected to hold UTF-8 text did not.
    #[error("field is not valid UTF-8")]
    InvalidUtf8,
}

impl ErrorCode for CodecError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedWireType(_) => "CODEC_UNSUPPORTED_WIRE_TYPE",
            Self::UnexpectedEnd => "CODEC_UNEXPECTED_END",
            Self::VarintOverflow => "CODEC_VARINT_OVERFLOW",
            Self::InvalidFrameFlag(_) => "CODEC_INVALID_FRAME_FLAG",
            Self::InvalidUtf8 => "CODEC_INVALID_UTF8",
        }
    }
}

/// Errors raised while decoding a query response message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// An expected field was absent from the decoded message.
    #[error("missing field: {0}")]
    MissingField(&'static str),
    /// The message's shape did not match what the decoder expected.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
    /// A numeric value exceeded the target integer type's range.
    #[error("value overflow decoding {0}")]
    ValueOverflow(&'static str),
    /// An enum value was not a recognized variant.
    #[error("unrecognized enum value {value} for {field}")]
    UnrecognizedEnum {
        /// The field being decoded.
        field: &'static str,
        /// The raw wire value that did not map to a known variant.
        value: i64,
    },
    /// The key material's oneof selector named an unsupported key type.
    #[error("unsupported key type {0}")]
    UnsupportedKeyType(u32),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl ErrorCode for DecodeError {
    fn code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "DECODE_MISSING_FIELD",
            Self::InvalidMessage(_) => "DECODE_INVALID_MESSAGE",
            Self::ValueOverflow(_) => "DECODE_VALUE_OVERFLOW",
            Self::UnrecognizedEnum { .. } => "DECODE_UNRECOGNIZED_ENUM",
            Self::UnsupportedKeyType(_) => "DECODE_UNSUPPORTED_KEY_TYPE",
            Self::Codec(e) => e.code(),
        }
    }
}

/// Errors raised by a transport (unary RPC, server stream, or REST fetch).
#[derive(Error, Debug)]
pub enum TransportError {
    /// The transport budget elapsed before an attempt could be issued.
    #[error("deadline exceeded")]
    DeadlineExceeded,
    /// The server returned a non-zero gRPC status in the trailer frame.
    #[error("grpc status {code}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    GrpcStatus {
        /// The gRPC status code from the trailer.
        code: u32,
        /// An optional human-readable message from `grpc-message`.
        message: Option<String>,
    },
    /// The server returned an HTTP error status without a usable gRPC status.
    #[error("http error {status}{}", .body.as_deref().map(|b| format!(": {b}")).unwrap_or_default())]
    HttpError {
        /// The HTTP status code.
        status: u16,
        /// An optional response body snippet.
        body: Option<String>,
    },
    /// A connection-level fault (refused, reset, TLS failure, read error).
    #[error("transport fault: {0}")]
    Fault(String),
    /// The response body exceeded the configured size cap.
    #[error("response body of {actual} bytes exceeds cap of {cap} bytes")]
    BodyTooLarge {
        /// The actual body size observed.
        actual: usize,
        /// The configured cap.
        cap: usize,
    },
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl ErrorCode for TransportError {
    fn code(&self) -> &'static str {
        match self {
            Self::DeadlineExceeded => "TRANSPORT_DEADLINE_EXCEEDED",
            Self::GrpcStatus { .. } => "TRANSPORT_GRPC_STATUS",
            Self::HttpError { .. } => "TRANSPORT_HTTP_ERROR",
            Self::Fault(_) => "TRANSPORT_FAULT",
            Self::BodyTooLarge { .. } => "TRANSPORT_BODY_TOO_LARGE",
            Self::Codec(e) => e.code(),
        }
    }
}

/// Errors raised by the Consensus Submitter before or during submission.
#[derive(Error, Debug)]
pub enum SubmitError {
    /// No node in the pool is currently eligible for selection.
    #[error("no healthy nodes available")]
    NoHealthyNodes,
    /// The client was constructed with an empty node list and no submit URL.
    #[error("no nodes configured")]
    NoNodesConfigured,
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl ErrorCode for SubmitError {
    fn code(&self) -> &'static str {
        match self {
            Self::NoHealthyNodes => "SUBMIT_NO_HEALTHY_NODES",
            Self::NoNodesConfigured => "SUBMIT_NO_NODES_CONFIGURED",
            Self::Transport(e) => e.code(),
            Self::Decode(e) => e.code(),
        }
    }
}

/// Errors raised by the Receipt Poller.
#[derive(Error, Debug)]
pub enum ReceiptError {
    /// The poller's wall-clock budget elapsed with no terminal status observed.
    #[error("receipt poll timed out before a terminal status was observed")]
    ReceiptTimedOut,
    /// The configured timeout was zero.
    #[error("invalid receipt timeout: must be non-zero")]
    InvalidReceiptTimeout,
    /// The configured poll interval was zero.
    #[error("invalid poll interval: must be non-zero")]
    InvalidPollInterval,
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

impl ErrorCode for ReceiptError {
    fn code(&self) -> &'static str {
        match self {
            Self::ReceiptTimedOut => "RECEIPT_TIMED_OUT",
            Self::InvalidReceiptTimeout => "RECEIPT_INVALID_TIMEOUT",
            Self::InvalidPollInterval => "RECEIPT_INVALID_POLL_INTERVAL",
            Self::Submit(e) => e.code(),
        }
    }
}

/// Errors raised by the Mirror REST/stream client.
#[derive(Error, Debug)]
pub enum MirrorError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The server's JSON response could not be parsed as expected.
    #[error("invalid mirror response: {0}")]
    InvalidResponse(String),
    /// A `links.next` continuation value could not be resolved against the base URL.
    #[error("invalid continuation cursor: {0}")]
    InvalidCursor(String),
}

impl ErrorCode for MirrorError {
    fn code(&self) -> &'static str {
        match self {
            Self::Transport(e) => e.code(),
            Self::Decode(e) => e.code(),
            Self::InvalidResponse(_) => "MIRROR_INVALID_RESPONSE",
            Self::InvalidCursor(_) => "MIRROR_INVALID_CURSOR",
        }
    }
}

/// Errors raised while resolving network configuration from environment
/// variables or a JSON config document.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `NETWORK` (or an explicit network name) did not match a known seed
    /// network and no custom node list was supplied.
    #[error("unknown network: {0}")]
    UnknownNetwork(String),
    /// A required environment variable was absent.
    #[error("missing environment variable {0}")]
    MissingEnvVar(&'static str),
    /// An operator key string was neither valid hex, PEM, nor DER.
    #[error("unrecognized operator key encoding")]
    UnrecognizedKeyEncoding,
    /// The config document's JSON could not be parsed.
    #[error("invalid config document: {0}")]
    InvalidDocument(String),
    /// A custom network's node list was empty.
    #[error("custom network requires at least one node")]
    EmptyCustomNetwork,
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownNetwork(_) => "CONFIG_UNKNOWN_NETWORK",
            Self::MissingEnvVar(_) => "CONFIG_MISSING_ENV_VAR",
            Self::UnrecognizedKeyEncoding => "CONFIG_UNRECOGNIZED_KEY_ENCODING",
            Self::InvalidDocument(_) => "CONFIG_INVALID_DOCUMENT",
            Self::EmptyCustomNetwork => "CONFIG_EMPTY_CUSTOM_NETWORK",
        }
    }
}

/// Invariant violations raised by builders before any network call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuilderError {
    /// `sign()` was called before `freeze()`.
    #[error("transaction is not frozen")]
    TransactionNotFrozen,
    /// A topic message submission carried zero bytes.
    #[error("topic message is empty")]
    EmptyMessage,
    /// A topic message submission exceeded the configured maximum size.
    #[error("message of {actual} bytes exceeds the {max} byte limit")]
    MessageTooLarge {
        /// The message size that was rejected.
        actual: usize,
        /// The configured maximum.
        max: usize,
    },
    /// An NFT transfer or query named a serial number `<= 0`.
    #[error("invalid serial number {0}")]
    InvalidSerialNumber(i64),
    /// A fungible token transfer specified a zero amount.
    #[error("zero-amount token transfer")]
    ZeroTokenTransfer,
    /// An operation required an account id that was not supplied.
    #[error("account id is required")]
    AccountIdRequired,
    /// A token-association-style operation was given an empty token list.
    #[error("no tokens specified")]
    NoTokensSpecified,
}

impl ErrorCode for BuilderError {
    fn code(&self) -> &'static str {
        match self {
            Self::TransactionNotFrozen => "BUILDER_NOT_FROZEN",
            Self::EmptyMessage => "BUILDER_EMPTY_MESSAGE",
            Self::MessageTooLarge { .. } => "BUILDER_MESSAGE_TOO_LARGE",
            Self::InvalidSerialNumber(_) => "BUILDER_INVALID_SERIAL_NUMBER",
            Self::ZeroTokenTransfer => "BUILDER_ZERO_TOKEN_TRANSFER",
            Self::AccountIdRequired => "BUILDER_ACCOUNT_ID_REQUIRED",
            Self::NoTokensSpecified => "BUILDER_NO_TOKENS_SPECIFIED",
        }
    }
}

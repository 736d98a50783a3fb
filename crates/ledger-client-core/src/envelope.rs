// Path: crates/ledger-client-core/src/envelope.rs
//! The Transaction Envelope: composes a signed outer message from body bytes
//! and an ordered set of `(pubkey, sig)` pairs.
//!
//! Per-operation transaction body schemas (accounts, tokens, files,
//! schedules, contracts) are out of this crate's scope — each is "just a
//! typed message plugged into the generic envelope." Concrete
//! body types live outside this crate and plug in via
//! [`TransactionBodyEncoder`], generated by `#[derive(TransactionBody)]`
//! from `ledger-client-macros` over a hand-written [`crate::codec::WireEncode`]
//! impl.

use crate::codec::{FieldWriter, Reader};
use crate::error::BuilderError;

/// `(public_key_prefix, signature)`. Order is insertion order and is
/// preserved in the wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignaturePair {
    /// The 32-byte public key (or a prefix identifying it; the Ledger's
    /// schema uses a oneof selector here for the signature algorithm).
    pub public_key_prefix: [u8; 32],
    /// The 64-byte signature over the frozen body bytes.
    pub signature: [u8; 64],
}

impl SignaturePair {
    fn write_into(&self, writer: &mut FieldWriter) {
        writer.write_bytes(1, &self.public_key_prefix);
        writer.write_bytes(3, &self.signature);
    }
}

/// Anything that can supply transaction body bytes and declare the field
/// number under which its operation kind is registered. Implemented by
/// `#[derive(TransactionBody)]` for concrete per-operation types, collapsing
/// the freeze/sign/execute scaffolding that would otherwise be duplicated
/// per builder.
pub trait TransactionBodyEncoder {
    /// The field number this operation occupies in the Ledger's published
    /// transaction-body numbering (informational; not used in the wire
    /// composition below, since the body is already fully opaque bytes).
    fn body_field_number(&self) -> u32;

    /// The complete opaque transaction body bytes.
    fn encode_body(&self) -> Vec<u8>;
}

/// Produces a signature over the exact frozen body bytes. The concrete
/// signature scheme (Ed25519-like, 64-byte signatures over a 32-byte public
/// key) is an external collaborator — this crate only needs the
/// shape of the call.
pub trait Signer {
    /// The 32-byte public key (or prefix) to record in the signature pair.
    fn public_key_prefix(&self) -> [u8; 32];

    /// Signs `message`, returning a 64-byte signature.
    fn sign(&self, message: &[u8]) -> [u8; 64];
}

/// A transaction envelope moving through the frozen → signed lifecycle.
///
/// Invariants:
/// - `freeze()` must be called before `sign()`.
/// - The body passed to each signer is byte-identical to what was frozen;
///   appending a signature never mutates it.
#[derive(Debug, Clone, Default)]
pub struct TransactionEnvelope {
    body_bytes: Option<Vec<u8>>,
    signatures: Vec<SignaturePair>,
}

impl TransactionEnvelope {
    /// Creates an empty, unfrozen envelope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes `body`'s bytes and locks them in; further mutation beyond
    /// appending signatures is disallowed.
    pub fn freeze(&mut self, body: &dyn TransactionBodyEncoder) {
        self.body_bytes = Some(body.encode_body());
    }

    /// True once `freeze()` has been called.
    pub fn is_frozen(&self) -> bool {
        self.body_bytes.is_some()
    }

    /// The frozen body bytes, if any.
    pub fn body_bytes(&self) -> Option<&[u8]> {
        self.body_bytes.as_deref()
    }

    /// Signs the frozen body with `signer` and appends the resulting pair.
    /// Fails with [`BuilderError::TransactionNotFrozen`] if called before `freeze()`.
    pub fn sign(&mut self, signer: &dyn Signer) -> Result<(), BuilderError> {
        let body = self
            .body_bytes
            .as_ref()
            .ok_or(BuilderError::TransactionNotFrozen)?;
        let signature = signer.sign(body);
        self.signatures.push(SignaturePair {
            public_key_prefix: signer.public_key_prefix(),
            signature,
        });
        Ok(())
    }

    /// Appends an already-computed signature pair, for callers that sign
    /// out-of-process (e.g. a hardware signer) and just need it recorded.
    pub fn add_signature(&mut self, pair: SignaturePair) -> Result<(), BuilderError> {
        if self.body_bytes.is_none() {
            return Err(BuilderError::TransactionNotFrozen);
        }
        self.signatures.push(pair);
        Ok(())
    }

    /// The signatures appended so far, in insertion order.
    pub fn signatures(&self) -> &[SignaturePair] {
        &self.signatures
    }

    /// Wire-encodes the outer message:
    /// `outer.field1 = signed_transaction { field1 = body, field2 = signature_map { repeated field1 = signature_pair } }`.
    pub fn encode_outer(&self) -> Result<Vec<u8>, BuilderError> {
        let body = self.body_bytes.as_ref().ok_or(BuilderError::TransactionNotFrozen)?;

        let mut sig_map = FieldWriter::new();
        for pair in &self.signatures {
            let mut pair_writer = FieldWriter::new();
            pair.write_into(&mut pair_writer);
            sig_map.write_message(1, &pair_writer.into_bytes());
        }

        let mut signed_transaction = FieldWriter::new();
        signed_transaction.write_message(1, body);
        signed_transaction.write_message(2, &sig_map.into_bytes());

        let mut outer = FieldWriter::new();
        outer.write_message(1, &signed_transaction.into_bytes());
        Ok(outer.into_bytes())
    }

    /// Extracts the embedded body bytes from a previously-encoded outer
    /// message, used by the Submitter to derive a transaction id when the
    /// node's precheck payload itself failed to parse.
    pub fn body_bytes_from_outer(outer: &[u8]) -> Option<Vec<u8>> {
        let mut reader = Reader::new(outer);
        let signed_transaction_bytes = reader.next().ok()??.value.as_bytes().ok()?.to_vec();
        let mut inner = Reader::new(&signed_transaction_bytes);
        while let Some(field) = inner.next().ok()? {
            if field.number == 1 {
                return field.value.as_bytes().ok().map(|b| b.to_vec());
            }
        }
        None
    }
}

/// Rejects a topic message submission before it reaches `freeze()`: empty
/// messages and messages over `max_message_bytes` are invariant violations,
/// not transport-level failures, so they're caught here rather than left
/// for the node to reject.
pub fn validate_topic_message(message: &[u8], max_message_bytes: usize) -> Result<(), BuilderError> {
    if message.is_empty() {
        return Err(BuilderError::EmptyMessage);
    }
    if message.len() > max_message_bytes {
        return Err(BuilderError::MessageTooLarge {
            actual: message.len(),
            max: max_message_bytes,
        });
    }
    Ok(())
}

/// Rejects an NFT serial number `<= 0`, the Ledger's reserved range for
/// "no serial assigned yet".
pub fn validate_nft_serial(serial: i64) -> Result<(), BuilderError> {
    if serial <= 0 {
        return Err(BuilderError::InvalidSerialNumber(serial));
    }
    Ok(())
}

/// Rejects a fungible token transfer carrying a zero amount: it has no
/// effect and the Ledger itself would reject it, so builders catch it
/// before submission.
pub fn validate_token_transfer_amount(amount: i64) -> Result<(), BuilderError> {
    if amount == 0 {
        return Err(BuilderError::ZeroTokenTransfer);
    }
    Ok(())
}

/// Rejects an operation that requires an explicit account id but was not
/// given one.
pub fn validate_account_id_present(account_id: Option<crate::model::EntityId>) -> Result<(), BuilderError> {
    account_id.map(|_| ()).ok_or(BuilderError::AccountIdRequired)
}

/// Rejects a token-association-style operation given an empty token list.
pub fn validate_tokens_specified<T>(tokens: &[T]) -> Result<(), BuilderError> {
    if tokens.is_empty() {
        return Err(BuilderError::NoTokensSpecified);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedBody(Vec<u8>);
    impl TransactionBodyEncoder for FixedBody {
        fn body_field_number(&self) -> u32 {
            14
        }
        fn encode_body(&self) -> Vec<u8> {
            self.0.clone()
        }
    }

    struct FakeSigner {
        key: [u8; 32],
    }
    impl Signer for FakeSigner {
        fn public_key_prefix(&self) -> [u8; 32] {
            self.key
        }
        fn sign(&self, message: &[u8]) -> [u8; 64] {
            // Deterministic stand-in for a real signature: a repeating
            // digest of the message, enough to prove identity end-to-end.
            let mut sig = [0u8; 64];
            for (i, byte) in message.iter().cycle().take(64).enumerate() {
                sig[i] = *byte;
            }
            sig
        }
    }

    #[test]
    fn sign_before_freeze_fails() {
        let mut env = TransactionEnvelope::new();
        let signer = FakeSigner { key: [1u8; 32] };
        assert_eq!(env.sign(&signer), Err(BuilderError::TransactionNotFrozen));
    }

    #[test]
    fn frozen_body_is_byte_identical_to_what_was_signed() {
        let mut env = TransactionEnvelope::new();
        let body = FixedBody(vec![1, 2, 3, 4]);
        env.freeze(&body);
        let signer = FakeSigner { key: [9u8; 32] };
        env.sign(&signer).unwrap();

        let frozen = env.body_bytes().unwrap().to_vec();
        assert_eq!(frozen, body.0);
        let sig = &env.signatures()[0];
        assert_eq!(sig.signature, signer.sign(&frozen));
    }

    #[test]
    fn signatures_preserve_insertion_order() {
        let mut env = TransactionEnvelope::new();
        env.freeze(&FixedBody(vec![7]));
        for k in 0u8..3 {
            env.sign(&FakeSigner { key: [k; 32] }).unwrap();
        }
        let keys: Vec<u8> = env.signatures().iter().map(|p| p.public_key_prefix[0]).collect();
        assert_eq!(keys, vec![0, 1, 2]);
    }

    #[test]
    fn outer_encoding_recovers_body_bytes() {
        let mut env = TransactionEnvelope::new();
        env.freeze(&FixedBody(vec![1, 2, 3]));
        env.sign(&FakeSigner { key: [5u8; 32] }).unwrap();
        let outer = env.encode_outer().unwrap();
        let recovered = TransactionEnvelope::body_bytes_from_outer(&outer).unwrap();
        assert_eq!(recovered, vec![1, 2, 3]);
    }

    #[test]
    fn topic_message_at_the_limit_succeeds() {
        let message = vec![0u8; 1024];
        assert_eq!(validate_topic_message(&message, 1024), Ok(()));
    }

    #[test]
    fn topic_message_one_byte_over_the_limit_fails() {
        let message = vec![0u8; 1025];
        assert_eq!(
            validate_topic_message(&message, 1024),
            Err(BuilderError::MessageTooLarge { actual: 1025, max: 1024 })
        );
    }

    #[test]
    fn empty_topic_message_fails() {
        assert_eq!(validate_topic_message(&[], 1024), Err(BuilderError::EmptyMessage));
    }

    #[test]
    fn nft_serial_at_or_below_zero_fails() {
        assert_eq!(validate_nft_serial(0), Err(BuilderError::InvalidSerialNumber(0)));
        assert_eq!(validate_nft_serial(-1), Err(BuilderError::InvalidSerialNumber(-1)));
        assert_eq!(validate_nft_serial(1), Ok(()));
    }

    #[test]
    fn zero_amount_token_transfer_fails() {
        assert_eq!(validate_token_transfer_amount(0), Err(BuilderError::ZeroTokenTransfer));
        assert_eq!(validate_token_transfer_amount(-50), Ok(()));
        assert_eq!(validate_token_transfer_amount(50), Ok(()));
    }

    #[test]
    fn missing_account_id_fails() {
        assert_eq!(
            validate_account_id_present(None),
            Err(BuilderError::AccountIdRequired)
        );
        assert_eq!(
            validate_account_id_present(Some(crate::model::EntityId::num(5))),
            Ok(())
        );
    }

    #[test]
    fn empty_token_list_fails() {
        let tokens: Vec<crate::model::EntityId> = Vec::new();
        assert_eq!(validate_tokens_specified(&tokens), Err(BuilderError::NoTokensSpecified));
        assert_eq!(
            validate_tokens_specified(&[crate::model::EntityId::num(1)]),
            Ok(())
        );
    }
}

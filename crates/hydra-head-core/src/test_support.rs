//! Toy `Ledger`/`IsChainState`/`SignatureScheme` fixtures shared by this
//! crate's unit tests. Not part of the public API.

use std::collections::BTreeMap;

use hydra_primitives::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{crypto::SignatureScheme, ledger::IsChainState, ledger::Ledger};

/// A transfer of `amount` against a single running balance. Negative
/// balances are the only way to make a transaction fail to apply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestTx(pub i64);

pub type TestUtxo = i64;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestValidationError(pub String);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestChainState {
    pub slot: u64,
}

impl IsChainState for TestChainState {
    fn slot(&self) -> u64 {
        self.slot
    }
}

pub struct TestLedger;

impl Ledger for TestLedger {
    type Tx = TestTx;
    type UTxO = TestUtxo;
    type ValidationError = TestValidationError;

    fn can_apply(&self, utxo: &TestUtxo, tx: &TestTx) -> Result<(), TestValidationError> {
        if utxo + tx.0 < 0 {
            Err(TestValidationError(format!("{utxo} + {} < 0", tx.0)))
        } else {
            Ok(())
        }
    }

    fn apply_transactions(
        &self,
        utxo: &TestUtxo,
        txs: &[TestTx],
    ) -> Result<TestUtxo, TestValidationError> {
        let mut balance = *utxo;
        for tx in txs {
            self.can_apply(&balance, tx)?;
            balance += tx.0;
        }
        Ok(balance)
    }

    fn empty_utxo(&self) -> TestUtxo {
        0
    }

    fn union_utxo<'a, I: IntoIterator<Item = &'a TestUtxo>>(&self, utxos: I) -> TestUtxo
    where
        TestUtxo: 'a,
    {
        utxos.into_iter().sum()
    }
}

/// A self-certifying mock scheme: a party's verification key is just its
/// signing key's bytes, so `sign` and `verify` can check each other without
/// any real cryptography. Good enough to exercise the collection/aggregation
/// logic in `transition::open`, not a substitute for a real scheme.
pub struct TestSigs;

impl SignatureScheme for TestSigs {
    fn sign(&self, key: &SigningKey, message: &[u8]) -> Buf64 {
        let mut bytes = key.as_bytes().to_vec();
        bytes.extend_from_slice(message);
        Buf64(bytes)
    }

    fn verify(&self, vkey: &VerificationKey, signature: &Buf64, message: &[u8]) -> bool {
        let mut expected = vkey.0.as_bytes().to_vec();
        expected.extend_from_slice(message);
        signature.0 == expected
    }

    fn aggregate_in_order(&self, ordered_signatures: &[Buf64]) -> Buf64 {
        let mut bytes = Vec::new();
        for sig in ordered_signatures {
            bytes.extend_from_slice(&sig.0);
        }
        Buf64(bytes)
    }
}

pub fn party_from_byte(b: u8) -> (Party, SigningKey) {
    let key = SigningKey::new([b; 32]);
    let vkey = VerificationKey(Buf32([b; 32]));
    (Party(vkey), key)
}

pub fn environment(
    b: u8,
    others: Vec<Party>,
    contestation_period: std::time::Duration,
) -> crate::params::Environment {
    let (party, signing_key) = party_from_byte(b);
    crate::params::Environment::new(party, signing_key, others, contestation_period)
}

pub fn empty_committed() -> BTreeMap<Party, TestUtxo> {
    BTreeMap::new()
}

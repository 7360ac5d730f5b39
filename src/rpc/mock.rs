//! Nœud RPC en mémoire pour les tests du moteur.

use super::{ChainRpc, SignatureState};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use solana_program_pack::Pack;
use solana_sdk::{
    account::Account, hash::Hash, pubkey::Pubkey, signature::Signature, system_program,
    transaction::Transaction,
};
use spl_token::state::{Account as SplTokenAccount, AccountState};
use std::{collections::HashMap, sync::Mutex, time::Duration};

pub const MOCK_RENT_EXEMPTION: u64 = 2_039_280;

struct MockState {
    accounts: HashMap<Pubkey, Account>,
    sent: Vec<Transaction>,
    read_calls: usize,
    blockhash_calls: usize,
    fail_reads: bool,
    fail_sends: bool,
    signature_state: SignatureState,
    read_delay: Option<Duration>,
}

pub struct MockRpc {
    state: Mutex<MockState>,
}

impl MockRpc {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                accounts: HashMap::new(),
                sent: Vec::new(),
                read_calls: 0,
                blockhash_calls: 0,
                fail_reads: false,
                fail_sends: false,
                signature_state: SignatureState::Confirmed,
                read_delay: None,
            }),
        }
    }

    pub fn set_token_account(&self, address: Pubkey, mint: Pubkey, owner: Pubkey, amount: u64) {
        let token = SplTokenAccount { mint, owner, amount, state: AccountState::Initialized, ..Default::default() };
        let mut data = vec![0u8; SplTokenAccount::LEN];
        SplTokenAccount::pack(token, &mut data).expect("pack du compte de test");
        let account = Account { lamports: MOCK_RENT_EXEMPTION, data, owner: spl_token::id(), executable: false, rent_epoch: 0 };
        self.state.lock().unwrap().accounts.insert(address, account);
    }

    pub fn set_native_account(&self, address: Pubkey, lamports: u64) {
        let account = Account { lamports, data: vec![], owner: system_program::id(), executable: false, rent_epoch: 0 };
        self.state.lock().unwrap().accounts.insert(address, account);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.state.lock().unwrap().fail_reads = fail;
    }

    pub fn fail_sends(&self, fail: bool) {
        self.state.lock().unwrap().fail_sends = fail;
    }

    pub fn set_signature_state(&self, state: SignatureState) {
        self.state.lock().unwrap().signature_state = state;
    }

    pub fn set_read_delay(&self, delay: Duration) {
        self.state.lock().unwrap().read_delay = Some(delay);
    }

    pub fn sent_transactions(&self) -> Vec<Transaction> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn read_calls(&self) -> usize {
        self.state.lock().unwrap().read_calls
    }

    pub fn blockhash_calls(&self) -> usize {
        self.state.lock().unwrap().blockhash_calls
    }
}

#[async_trait]
impl ChainRpc for MockRpc {
    async fn get_multiple_accounts(&self, pubkeys: &[Pubkey]) -> Result<Vec<Option<Account>>> {
        let delay = self.state.lock().unwrap().read_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut state = self.state.lock().unwrap();
        state.read_calls += 1;
        if state.fail_reads {
            return Err(anyhow!("connexion refusée"));
        }
        Ok(pubkeys.iter().map(|key| state.accounts.get(key).cloned()).collect())
    }

    async fn get_latest_blockhash(&self) -> Result<Hash> {
        self.state.lock().unwrap().blockhash_calls += 1;
        Ok(Hash::new_unique())
    }

    async fn get_minimum_balance_for_rent_exemption(&self, _data_len: usize) -> Result<u64> {
        Ok(MOCK_RENT_EXEMPTION)
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature> {
        let mut state = self.state.lock().unwrap();
        if state.fail_sends {
            return Err(anyhow!("blockhash introuvable"));
        }
        state.sent.push(transaction.clone());
        Ok(transaction.signatures[0])
    }

    async fn get_signature_state(&self, _signature: &Signature) -> Result<SignatureState> {
        Ok(self.state.lock().unwrap().signature_state.clone())
    }
}

use anchor_lang::solana_program::sysvar;
use energy_optimizer::{accounts, instruction};
use litesvm::types::TransactionResult;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};

use crate::setup::{build_instruction, program_pubkey, Accounts, TestFixture, Utils};

pub trait Instructions {
    fn initialize_config(
        &mut self,
        admin: &Keypair,
        decryption_timeout_slots: Option<u64>,
        refund_pool_amount: Option<u64>,
        min_run_interval_slots: Option<u64>,
    ) -> TransactionResult;

    fn initialize_registries(&mut self, admin: &Keypair) -> TransactionResult;

    fn set_oracle_pubkey(&mut self, admin: &Keypair, oracle: &Pubkey) -> TransactionResult;

    fn set_pause(&mut self, admin: &Keypair, paused: bool) -> TransactionResult;

    fn update_run_policy(
        &mut self,
        admin: &Keypair,
        decryption_timeout_slots: u64,
        refund_pool_amount: u64,
        min_run_interval_slots: u64,
    ) -> TransactionResult;

    fn fund_refund_vault(
        &mut self,
        funder: &Keypair,
        funder_token_account: &Pubkey,
        amount: u64,
    ) -> TransactionResult;

    fn register_device(&mut self, owner: &Keypair) -> TransactionResult;

    fn set_device_active(
        &mut self,
        authority: &Keypair,
        device: &Pubkey,
        active: bool,
    ) -> TransactionResult;

    fn start_run(&mut self, payer: &Keypair, handles: Vec<[u8; 32]>) -> TransactionResult;

    fn get_status(&mut self, payer: &Keypair, run_id: u64) -> TransactionResult;

    fn deliver_callback_ix(
        &self,
        request_id: u64,
        run_account: &Pubkey,
        cleartexts: Vec<u8>,
        proof: [u8; 64],
    ) -> Instruction;

    fn deliver_callback(
        &mut self,
        payer: &Keypair,
        ed25519_ix: Option<Instruction>,
        callback_ix: Instruction,
    ) -> TransactionResult;

    fn check_timeout(&mut self, cranker: &Keypair, run_id: u64) -> TransactionResult;

    fn claim_refund(
        &mut self,
        participant: &Keypair,
        participant_token_account: &Pubkey,
        run_id: u64,
    ) -> TransactionResult;
}

impl Instructions for TestFixture {
    fn initialize_config(
        &mut self,
        admin: &Keypair,
        decryption_timeout_slots: Option<u64>,
        refund_pool_amount: Option<u64>,
        min_run_interval_slots: Option<u64>,
    ) -> TransactionResult {
        let ix = build_instruction(
            &self.program_id,
            accounts::InitializeConfig {
                config: program_pubkey(&self.find_config_pda().0),
                refund_mint: program_pubkey(&self.refund_mint),
                refund_vault: program_pubkey(&self.find_refund_vault_pda().0),
                admin: program_pubkey(&admin.pubkey()),
                token_program: anchor_spl::token::ID,
                system_program: anchor_lang::system_program::ID,
                rent: sysvar::rent::ID,
            },
            instruction::InitializeConfig {
                decryption_timeout_slots,
                refund_pool_amount,
                min_run_interval_slots,
            },
        );

        self.svm.send_tx(&[ix], &admin.pubkey(), &[admin])
    }

    fn initialize_registries(&mut self, admin: &Keypair) -> TransactionResult {
        let ix = build_instruction(
            &self.program_id,
            accounts::InitializeRegistries {
                config: program_pubkey(&self.find_config_pda().0),
                run_registry: program_pubkey(&self.find_run_registry_pda().0),
                participant_registry: program_pubkey(&self.find_participant_registry_pda().0),
                admin: program_pubkey(&admin.pubkey()),
                system_program: anchor_lang::system_program::ID,
                rent: sysvar::rent::ID,
            },
            instruction::InitializeRegistries {},
        );

        self.svm.send_tx(&[ix], &admin.pubkey(), &[admin])
    }

    fn set_oracle_pubkey(&mut self, admin: &Keypair, oracle: &Pubkey) -> TransactionResult {
        let ix = build_instruction(
            &self.program_id,
            accounts::UpdateConfig {
                config: program_pubkey(&self.find_config_pda().0),
                admin: program_pubkey(&admin.pubkey()),
            },
            instruction::SetOraclePubkey {
                oracle_pubkey: program_pubkey(oracle),
            },
        );

        self.svm.send_tx(&[ix], &admin.pubkey(), &[admin])
    }

    fn set_pause(&mut self, admin: &Keypair, paused: bool) -> TransactionResult {
        let ix = build_instruction(
            &self.program_id,
            accounts::UpdateConfig {
                config: program_pubkey(&self.find_config_pda().0),
                admin: program_pubkey(&admin.pubkey()),
            },
            instruction::SetPause { paused },
        );

        self.svm.send_tx(&[ix], &admin.pubkey(), &[admin])
    }

    fn update_run_policy(
        &mut self,
        admin: &Keypair,
        decryption_timeout_slots: u64,
        refund_pool_amount: u64,
        min_run_interval_slots: u64,
    ) -> TransactionResult {
        let ix = build_instruction(
            &self.program_id,
            accounts::UpdateConfig {
                config: program_pubkey(&self.find_config_pda().0),
                admin: program_pubkey(&admin.pubkey()),
            },
            instruction::UpdateRunPolicy {
                decryption_timeout_slots,
                refund_pool_amount,
                min_run_interval_slots,
            },
        );

        self.svm.send_tx(&[ix], &admin.pubkey(), &[admin])
    }

    fn fund_refund_vault(
        &mut self,
        funder: &Keypair,
        funder_token_account: &Pubkey,
        amount: u64,
    ) -> TransactionResult {
        let ix = build_instruction(
            &self.program_id,
            accounts::FundRefundVault {
                config: program_pubkey(&self.find_config_pda().0),
                refund_mint: program_pubkey(&self.refund_mint),
                refund_vault: program_pubkey(&self.find_refund_vault_pda().0),
                funder: program_pubkey(&funder.pubkey()),
                funder_token_account: program_pubkey(funder_token_account),
                token_program: anchor_spl::token::ID,
            },
            instruction::FundRefundVault { amount },
        );

        self.svm.send_tx(&[ix], &funder.pubkey(), &[funder])
    }

    fn register_device(&mut self, owner: &Keypair) -> TransactionResult {
        let ix = build_instruction(
            &self.program_id,
            accounts::RegisterDevice {
                config: program_pubkey(&self.find_config_pda().0),
                participant_registry: program_pubkey(&self.find_participant_registry_pda().0),
                owner: program_pubkey(&owner.pubkey()),
            },
            instruction::RegisterDevice {},
        );

        self.svm.send_tx(&[ix], &owner.pubkey(), &[owner])
    }

    fn set_device_active(
        &mut self,
        authority: &Keypair,
        device: &Pubkey,
        active: bool,
    ) -> TransactionResult {
        let ix = build_instruction(
            &self.program_id,
            accounts::SetDeviceActive {
                config: program_pubkey(&self.find_config_pda().0),
                participant_registry: program_pubkey(&self.find_participant_registry_pda().0),
                authority: program_pubkey(&authority.pubkey()),
            },
            instruction::SetDeviceActive {
                device: program_pubkey(device),
                active,
            },
        );

        self.svm.send_tx(&[ix], &authority.pubkey(), &[authority])
    }

    fn start_run(&mut self, payer: &Keypair, handles: Vec<[u8; 32]>) -> TransactionResult {
        let run_id = self.get_run_registry().next_run_id;
        let request_id = self.get_config().next_request_id;

        let ix = build_instruction(
            &self.program_id,
            accounts::StartRun {
                config: program_pubkey(&self.find_config_pda().0),
                run_registry: program_pubkey(&self.find_run_registry_pda().0),
                participant_registry: program_pubkey(&self.find_participant_registry_pda().0),
                run: program_pubkey(&self.find_run_pda(run_id).0),
                request_record: program_pubkey(&self.find_request_record_pda(request_id).0),
                payer: program_pubkey(&payer.pubkey()),
                system_program: anchor_lang::system_program::ID,
            },
            instruction::StartRun {
                ciphertext_handles: handles,
            },
        );

        self.svm.send_tx(&[ix], &payer.pubkey(), &[payer])
    }

    fn get_status(&mut self, payer: &Keypair, run_id: u64) -> TransactionResult {
        let ix = build_instruction(
            &self.program_id,
            accounts::GetStatus {
                run: program_pubkey(&self.find_run_pda(run_id).0),
            },
            instruction::GetStatus { run_id },
        );

        self.svm.send_tx(&[ix], &payer.pubkey(), &[payer])
    }

    fn deliver_callback_ix(
        &self,
        request_id: u64,
        run_account: &Pubkey,
        cleartexts: Vec<u8>,
        proof: [u8; 64],
    ) -> Instruction {
        build_instruction(
            &self.program_id,
            accounts::DeliverCallback {
                config: program_pubkey(&self.find_config_pda().0),
                request_record: program_pubkey(&self.find_request_record_pda(request_id).0),
                run: program_pubkey(run_account),
                instructions: sysvar::instructions::ID,
            },
            instruction::DeliverCallback {
                request_id,
                cleartexts,
                proof,
            },
        )
    }

    fn deliver_callback(
        &mut self,
        payer: &Keypair,
        ed25519_ix: Option<Instruction>,
        callback_ix: Instruction,
    ) -> TransactionResult {
        let mut ixs = Vec::with_capacity(2);
        if let Some(ix) = ed25519_ix {
            ixs.push(ix);
        }
        ixs.push(callback_ix);

        self.svm.send_tx(&ixs, &payer.pubkey(), &[payer])
    }

    fn check_timeout(&mut self, cranker: &Keypair, run_id: u64) -> TransactionResult {
        let ix = build_instruction(
            &self.program_id,
            accounts::CheckTimeout {
                config: program_pubkey(&self.find_config_pda().0),
                run: program_pubkey(&self.find_run_pda(run_id).0),
                refund_ledger: program_pubkey(&self.find_refund_ledger_pda(run_id).0),
                cranker: program_pubkey(&cranker.pubkey()),
                system_program: anchor_lang::system_program::ID,
            },
            instruction::CheckTimeout { run_id },
        );

        self.svm.send_tx(&[ix], &cranker.pubkey(), &[cranker])
    }

    fn claim_refund(
        &mut self,
        participant: &Keypair,
        participant_token_account: &Pubkey,
        run_id: u64,
    ) -> TransactionResult {
        let ix = build_instruction(
            &self.program_id,
            accounts::ClaimRefund {
                config: program_pubkey(&self.find_config_pda().0),
                run: program_pubkey(&self.find_run_pda(run_id).0),
                refund_ledger: program_pubkey(&self.find_refund_ledger_pda(run_id).0),
                refund_mint: program_pubkey(&self.refund_mint),
                refund_vault: program_pubkey(&self.find_refund_vault_pda().0),
                participant: program_pubkey(&participant.pubkey()),
                participant_token_account: program_pubkey(participant_token_account),
                token_program: anchor_spl::token::ID,
            },
            instruction::ClaimRefund { run_id },
        );

        self.svm.send_tx(&[ix], &participant.pubkey(), &[participant])
    }
}

/// Message the oracle signs for `run_id`'s pending request.
pub fn oracle_message(fixture: &TestFixture, run_id: u64, cleartexts: &[u8]) -> Vec<u8> {
    let run = fixture.get_run(run_id);
    energy_optimizer::expected_decryption_msg(
        &program_pubkey(&fixture.program_id),
        run.oracle_request_id,
        run_id,
        &run.payload_digest,
        cleartexts,
    )
}


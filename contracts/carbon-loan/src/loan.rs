use soroban_sdk::{
    Address, Bytes, BytesN, Env, I256, String, Symbol, U256, Vec, contract, contractimpl,
    contracttype, log, symbol_short, vec,
};

use crate::{
    CreateLoanParams, Error, LoanState, LoanTerms, LoanView, MetadataValue, VerifiedProject,
    index_types::{
        CarbonCreditPriceUpdated, LoanAccepted, LoanCreated, LoanFunded, LoanLiquidated,
        LoanNoLongerSwappable, LoanNotSwappable, LoanRepayed, LoanSwappable, LoanSwapped,
        PaymentMade, ProjectAdded, ProjectElementUpdated,
    },
    interfaces::{CarbonCreditRegistryClient, LoanMetadataClient},
    keys::{
        self, NYX_BORROWER, NYX_CARBON_CREDITS_BALANCE, NYX_INITIAL_LOAN_AMOUNT, NYX_LENDER,
        NYX_LOAN_BALANCE, NYX_LOAN_STATUS, NYX_PAYMENT_INDEX, NYX_VERIFIED_PROJECT_GEOGRAPHIC_IDENTIFIERS,
        NYX_VERIFIED_PROJECT_LINKS, NYX_VERIFIED_PROJECT_NAMES, NYX_VERIFIED_PROJECT_UNITS,
        NYX_VERIFIED_PROJECT_VERIFICATION_LINKS, PROJECT_LIST_KEYS,
    },
    math::{self, BASIS_POINTS, COMPOUNDING_PERIODS},
    settlement::SettlementAsset,
    storage::LoanRecord,
    swap::{self, IsSwapEvaluator, PriceSnapshot, SwapDecision, SwapOutcome, SwapQuote},
};

const VERSION_STRING: &str = concat!(
    env!("CARGO_PKG_VERSION_MAJOR"),
    ".",
    env!("CARGO_PKG_VERSION_MINOR"),
    ".",
    env!("CARGO_PKG_VERSION_PATCH")
);

const ADMIN_KEY: Symbol = symbol_short!("ADMIN");

// Instance storage
const STORAGE: Symbol = symbol_short!("STORAGE");

// Persistent storage keys
#[contracttype]
enum DataKey {
    /// Terms, schedule, custody and swap quote of a loan
    Loan(BytesN<32>),
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct CarbonLoanStorage {
    /// Metadata store holding the per-loan fields
    metadata: Address,
    /// Registry receiving carbon credit records when a loan is swapped
    credit_registry: Address,
    /// Asset loans are funded and repaid in
    settlement: SettlementAsset,
    /// Receives the transaction fee of every installment
    fee_recipient: Address,
    /// Set once both the metadata store and the registry handed control to this contract
    activated: bool,
    /// Latest carbon credit price
    carbon_credit_price: PriceSnapshot,
}

impl CarbonLoanStorage {
    fn get_state(env: &Env) -> CarbonLoanStorage {
        env.storage().instance().get(&STORAGE).unwrap()
    }

    fn set_state(env: &Env, storage: &CarbonLoanStorage) {
        env.storage().instance().set(&STORAGE, &storage);
    }

    fn get_loan(env: &Env, token_id: &BytesN<32>) -> Result<LoanRecord, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Loan(token_id.clone()))
            .ok_or(Error::LoanNotFound)
    }

    fn set_loan(env: &Env, token_id: &BytesN<32>, record: &LoanRecord) {
        let key = DataKey::Loan(token_id.clone());
        env.storage().persistent().set(&key, record);

        let ttl = env.storage().max_ttl();
        env.storage().persistent().extend_ttl(&key, ttl, ttl);
    }
}

/// Typed access to the fields of one loan in the metadata store
struct LoanFields<'a> {
    env: &'a Env,
    store: LoanMetadataClient<'a>,
    token_id: BytesN<32>,
}

impl<'a> LoanFields<'a> {
    fn new(env: &'a Env, state: &CarbonLoanStorage, token_id: BytesN<32>) -> Self {
        LoanFields {
            env,
            store: LoanMetadataClient::new(env, &state.metadata),
            token_id,
        }
    }

    fn key(&self, raw: &[u8; 32]) -> BytesN<32> {
        keys::key(self.env, raw)
    }

    fn state(&self) -> Result<LoanState, Error> {
        let code = self
            .store
            .get_decoded_uint256(&self.token_id, &self.key(&NYX_LOAN_STATUS));
        code.to_u128()
            .and_then(|code| u32::try_from(code).ok())
            .and_then(LoanState::from_code)
            .ok_or(Error::CorruptLoanData)
    }

    fn set_state(&self, state: LoanState) {
        self.store.set_data(
            &self.token_id,
            &self.key(&NYX_LOAN_STATUS),
            &state_value(self.env, state),
        );
    }

    fn amount(&self, raw: &[u8; 32]) -> Result<i128, Error> {
        let value = self.store.get_decoded_uint256(&self.token_id, &self.key(raw));
        value
            .to_u128()
            .and_then(|value| i128::try_from(value).ok())
            .ok_or(Error::CorruptLoanData)
    }

    fn set_amount(&self, raw: &[u8; 32], amount: i128) -> Result<(), Error> {
        self.store
            .set_data(&self.token_id, &self.key(raw), &amount_value(self.env, amount)?);
        Ok(())
    }

    fn payment_index(&self) -> Result<u32, Error> {
        let value = self
            .store
            .get_decoded_uint256(&self.token_id, &self.key(&NYX_PAYMENT_INDEX));
        value
            .to_u128()
            .and_then(|value| u32::try_from(value).ok())
            .ok_or(Error::CorruptLoanData)
    }

    fn set_payment_index(&self, index: u32) {
        self.store.set_data(
            &self.token_id,
            &self.key(&NYX_PAYMENT_INDEX),
            &MetadataValue::UInt256(U256::from_u32(self.env, index)),
        );
    }

    fn lender(&self) -> Address {
        self.store
            .get_decoded_address(&self.token_id, &self.key(&NYX_LENDER))
    }

    fn borrower(&self) -> Result<Option<Address>, Error> {
        match self.store.get_data(&self.token_id, &self.key(&NYX_BORROWER)) {
            None => Ok(None),
            Some(MetadataValue::Address(borrower)) => Ok(Some(borrower)),
            Some(_) => Err(Error::CorruptLoanData),
        }
    }

    fn set_address(&self, raw: &[u8; 32], address: Address) {
        self.store
            .set_data(&self.token_id, &self.key(raw), &MetadataValue::Address(address));
    }

    /// Length of the project lists, read from the name list
    fn project_count(&self) -> Result<u32, Error> {
        match self
            .store
            .get_data(&self.token_id, &self.key(&NYX_VERIFIED_PROJECT_NAMES))
        {
            None => Ok(0),
            Some(MetadataValue::UInt256(len)) => len
                .to_u128()
                .and_then(|len| u32::try_from(len).ok())
                .ok_or(Error::CorruptLoanData),
            Some(_) => Err(Error::CorruptLoanData),
        }
    }

    fn project(&self, index: u32) -> Result<VerifiedProject, Error> {
        if index >= self.project_count()? {
            return Err(Error::ProjectNotFound);
        }
        let element = |list: &[u8; 32]| keys::element_key(self.env, list, index);
        let units = self
            .store
            .get_decoded_int256(&self.token_id, &element(&NYX_VERIFIED_PROJECT_UNITS))
            .to_i128()
            .ok_or(Error::CorruptLoanData)?;
        Ok(VerifiedProject {
            name: self
                .store
                .get_decoded_string(&self.token_id, &element(&NYX_VERIFIED_PROJECT_NAMES)),
            link: self
                .store
                .get_decoded_string(&self.token_id, &element(&NYX_VERIFIED_PROJECT_LINKS)),
            units,
            geographic_identifier: self.store.get_decoded_string(
                &self.token_id,
                &element(&NYX_VERIFIED_PROJECT_GEOGRAPHIC_IDENTIFIERS),
            ),
            verification_link: self.store.get_decoded_string(
                &self.token_id,
                &element(&NYX_VERIFIED_PROJECT_VERIFICATION_LINKS),
            ),
        })
    }
}

fn state_value(env: &Env, state: LoanState) -> MetadataValue {
    MetadataValue::UInt256(U256::from_u32(env, state as u32))
}

fn amount_value(env: &Env, amount: i128) -> Result<MetadataValue, Error> {
    let amount = u128::try_from(amount).map_err(|_| Error::ArithmeticError)?;
    Ok(MetadataValue::UInt256(U256::from_u128(env, amount)))
}

fn require_state(current: LoanState, allowed: &[LoanState]) -> Result<(), Error> {
    if allowed.contains(&current) {
        Ok(())
    } else {
        Err(Error::ActionNotAllowedInCurrentState)
    }
}

#[contract]
pub struct CarbonLoanContract;

#[contractimpl]
impl CarbonLoanContract {
    pub fn __constructor(
        env: &Env,
        admin: Address,
        metadata: Address,
        credit_registry: Address,
        settlement: SettlementAsset,
        fee_recipient: Address,
    ) {
        Self::set_admin(env, &admin);
        CarbonLoanStorage::set_state(
            env,
            &CarbonLoanStorage {
                metadata,
                credit_registry,
                settlement,
                fee_recipient,
                activated: false,
                carbon_credit_price: PriceSnapshot {
                    price: 0,
                    timestamp: 0,
                },
            },
        );
    }

    /// Upgrade the contract to new wasm. Admin-only.
    pub fn upgrade(env: &Env, new_wasm_hash: BytesN<32>) {
        Self::require_admin(env);
        env.deployer().update_current_contract_wasm(new_wasm_hash);
    }

    /// Enable loan operations once the metadata store and the credit registry
    /// both name this contract as their controller. Admin-only.
    pub fn activate(env: &Env) -> Result<(), Error> {
        Self::require_admin(env);
        let mut state = CarbonLoanStorage::get_state(env);
        if state.activated {
            return Err(Error::AlreadyActivated);
        }
        let this = Some(env.current_contract_address());
        let store = LoanMetadataClient::new(env, &state.metadata);
        let registry = CarbonCreditRegistryClient::new(env, &state.credit_registry);
        if store.controller() != this || registry.controller() != this {
            return Err(Error::ControllerNotTransferred);
        }
        state.activated = true;
        CarbonLoanStorage::set_state(env, &state);
        log!(env, "carbon loan contract activated");
        Ok(())
    }

    pub fn is_activated(env: &Env) -> bool {
        CarbonLoanStorage::get_state(env).activated
    }

    pub fn admin(env: &Env) -> Option<Address> {
        env.storage().instance().get(&ADMIN_KEY)
    }

    pub fn metadata_contract(env: &Env) -> Address {
        CarbonLoanStorage::get_state(env).metadata
    }

    pub fn credit_registry(env: &Env) -> Address {
        CarbonLoanStorage::get_state(env).credit_registry
    }

    pub fn settlement(env: &Env) -> SettlementAsset {
        CarbonLoanStorage::get_state(env).settlement
    }

    pub fn fee_recipient(env: &Env) -> Address {
        CarbonLoanStorage::get_state(env).fee_recipient
    }

    pub fn set_fee_recipient(env: &Env, fee_recipient: Address) {
        Self::require_admin(env);
        let mut state = CarbonLoanStorage::get_state(env);
        state.fee_recipient = fee_recipient;
        CarbonLoanStorage::set_state(env, &state);
    }

    pub fn version(env: &Env) -> String {
        String::from_str(env, VERSION_STRING)
    }

    /// Mint a loan token to the lender and record the loan as `Created`. Admin-only.
    pub fn create_loan(env: &Env, params: CreateLoanParams) -> Result<BytesN<32>, Error> {
        Self::require_admin(env);
        let state = Self::require_activated(env)?;
        if params.initial_loan_amount <= 0
            || params.amortization_period_in_months == 0
            || i128::from(params.transaction_bps) > BASIS_POINTS
            || params.carbon_credits_staked < 0
        {
            return Err(Error::InvalidLoanTerms);
        }
        // the total loan value must be representable before anyone funds the loan
        math::calculate_total_loan_value(params.initial_loan_amount, params.apy, COMPOUNDING_PERIODS)
            .map_err(|_| Error::InvalidLoanTerms)?;

        let store = LoanMetadataClient::new(env, &state.metadata);
        let token_id = store.mint(&params.lender);

        let key = |raw: &[u8; 32]| keys::key(env, raw);
        let mut field_keys = vec![
            env,
            key(&NYX_LENDER),
            key(&NYX_LOAN_STATUS),
            key(&NYX_INITIAL_LOAN_AMOUNT),
            key(&NYX_LOAN_BALANCE),
            key(&NYX_PAYMENT_INDEX),
            key(&NYX_CARBON_CREDITS_BALANCE),
        ];
        let mut values = vec![
            env,
            MetadataValue::Address(params.lender.clone()),
            state_value(env, LoanState::Created),
            amount_value(env, params.initial_loan_amount)?,
            amount_value(env, 0)?,
            MetadataValue::UInt256(U256::from_u32(env, 0)),
            amount_value(env, params.carbon_credits_staked)?,
        ];
        if let Some(borrower) = &params.borrower {
            field_keys.push_back(key(&NYX_BORROWER));
            values.push_back(MetadataValue::Address(borrower.clone()));
        }
        store.set_data_batch(&token_id, &field_keys, &values);

        let terms = LoanTerms {
            apy: params.apy,
            amortization_period_in_months: params.amortization_period_in_months,
            lock_up_period_in_months: params.lock_up_period_in_months,
            transaction_bps: params.transaction_bps,
            carbon_credits_staked: params.carbon_credits_staked,
        };
        CarbonLoanStorage::set_loan(env, &token_id, &LoanRecord::new(terms.clone(), Vec::new(env)));

        log!(env, "loan created for {}", params.initial_loan_amount);
        LoanCreated {
            token_id: token_id.clone(),
            lender: params.lender,
            borrower: params.borrower,
            initial_loan_amount: params.initial_loan_amount,
            terms,
        }
        .publish(env);
        Ok(token_id)
    }

    /// Lender moves the principal into custody. The balance becomes the total loan value.
    pub fn fund_loan(env: &Env, caller: Address, token_id: BytesN<32>) -> Result<(), Error> {
        let state = Self::require_activated(env)?;
        let mut record = CarbonLoanStorage::get_loan(env, &token_id)?;
        let loan = LoanFields::new(env, &state, token_id.clone());
        let lender = loan.lender();
        Self::require_caller(env, &caller, &lender)?;
        require_state(loan.state()?, &[LoanState::Created])?;

        let principal = loan.amount(&NYX_INITIAL_LOAN_AMOUNT)?;
        state.settlement.collect(env, &lender, principal)?;

        let total_loan_value =
            math::calculate_total_loan_value(principal, record.terms.apy, COMPOUNDING_PERIODS)?;
        loan.set_amount(&NYX_LOAN_BALANCE, total_loan_value)?;
        record.custody_balance = record
            .custody_balance
            .checked_add(principal)
            .ok_or(Error::ArithmeticError)?;
        CarbonLoanStorage::set_loan(env, &token_id, &record);
        loan.set_state(LoanState::Funded);

        log!(env, "loan funded, total loan value {}", total_loan_value);
        LoanFunded {
            token_id,
            initiator: caller,
            from: lender,
            to: env.current_contract_address(),
            amount: principal,
            success: true,
            data: Bytes::new(env),
        }
        .publish(env);
        Ok(())
    }

    /// Borrower takes the principal held in custody.
    pub fn accept_loan(env: &Env, caller: Address, token_id: BytesN<32>) -> Result<(), Error> {
        let state = Self::require_activated(env)?;
        let mut record = CarbonLoanStorage::get_loan(env, &token_id)?;
        let loan = LoanFields::new(env, &state, token_id.clone());
        let borrower = loan.borrower()?.ok_or(Error::BorrowerNotSet)?;
        Self::require_caller(env, &caller, &borrower)?;
        require_state(loan.state()?, &[LoanState::Funded])?;

        let amount = record.custody_balance;
        state.settlement.release(env, &borrower, amount)?;
        record.custody_balance = 0;
        CarbonLoanStorage::set_loan(env, &token_id, &record);
        loan.set_state(LoanState::Taken);

        log!(env, "loan accepted by {}", borrower);
        LoanAccepted {
            token_id,
            initiator: caller,
            from: env.current_contract_address(),
            to: borrower,
            amount,
            success: true,
            data: Bytes::new(env),
        }
        .publish(env);
        Ok(())
    }

    /// Replace the due timestamps of a loan and restart the payment index. Admin-only.
    pub fn set_payment_schedule(
        env: &Env,
        token_id: BytesN<32>,
        timestamps: Vec<u64>,
    ) -> Result<(), Error> {
        Self::require_admin(env);
        let state = Self::require_activated(env)?;
        let mut record = CarbonLoanStorage::get_loan(env, &token_id)?;
        let loan = LoanFields::new(env, &state, token_id.clone());
        if loan.state()?.is_closed() {
            return Err(Error::ActionNotAllowedInCurrentState);
        }
        if timestamps.is_empty() {
            return Err(Error::InvalidPaymentSchedule);
        }
        let mut previous = 0u64;
        for timestamp in timestamps.iter() {
            if timestamp < previous {
                return Err(Error::InvalidPaymentSchedule);
            }
            previous = timestamp;
        }

        record.schedule = timestamps;
        CarbonLoanStorage::set_loan(env, &token_id, &record);
        loan.set_payment_index(0);
        Ok(())
    }

    pub fn get_payment_schedule(env: &Env, token_id: BytesN<32>) -> Result<Vec<u64>, Error> {
        Ok(CarbonLoanStorage::get_loan(env, &token_id)?.schedule)
    }

    /// Next installment as `(net, fee)`: the balance spread over the periods left.
    pub fn calculate_payment(env: &Env, token_id: BytesN<32>) -> Result<(i128, i128), Error> {
        let state = CarbonLoanStorage::get_state(env);
        let record = CarbonLoanStorage::get_loan(env, &token_id)?;
        let loan = LoanFields::new(env, &state, token_id);
        Self::installment(&loan, &record.terms)
    }

    /// Borrower pays the next installment once it is due. Net goes to the
    /// lender and the fee to the fee recipient.
    pub fn make_payment(env: &Env, caller: Address, token_id: BytesN<32>) -> Result<(), Error> {
        let state = Self::require_activated(env)?;
        let record = CarbonLoanStorage::get_loan(env, &token_id)?;
        let loan = LoanFields::new(env, &state, token_id.clone());
        let borrower = loan.borrower()?.ok_or(Error::BorrowerNotSet)?;
        Self::require_caller(env, &caller, &borrower)?;
        require_state(loan.state()?, &[LoanState::Taken])?;

        let balance = loan.amount(&NYX_LOAN_BALANCE)?;
        if balance <= 0 {
            return Err(Error::ZeroBalanceOnLoan);
        }
        let index = loan.payment_index()?;
        // installments past the end of the schedule fall due with its last entry
        let due = record
            .schedule
            .get(index)
            .or_else(|| record.schedule.last())
            .ok_or(Error::PaymentScheduleNotSet)?;
        if env.ledger().timestamp() < due {
            return Err(Error::PaymentNotDue);
        }

        let (net, fee) = Self::installment(&loan, &record.terms)?;
        let lender = loan.lender();
        state.settlement.pay_from(env, &borrower, &lender, net)?;
        state
            .settlement
            .pay_from(env, &borrower, &state.fee_recipient, fee)?;

        PaymentMade {
            token_id: token_id.clone(),
            initiator: caller.clone(),
            from: borrower.clone(),
            to: lender,
            amount: net,
            success: true,
            data: Bytes::new(env),
        }
        .publish(env);
        PaymentMade {
            token_id: token_id.clone(),
            initiator: caller,
            from: borrower.clone(),
            to: state.fee_recipient.clone(),
            amount: fee,
            success: true,
            data: Bytes::new(env),
        }
        .publish(env);

        let paid = net.checked_add(fee).ok_or(Error::ArithmeticError)?;
        let remaining = balance.checked_sub(paid).ok_or(Error::ArithmeticError)?;
        loan.set_amount(&NYX_LOAN_BALANCE, remaining)?;
        let next_index = index.checked_add(1).ok_or(Error::ArithmeticError)?;
        loan.set_payment_index(next_index);

        if next_index >= record.terms.amortization_period_in_months || remaining == 0 {
            loan.set_state(LoanState::Repaid);
            log!(env, "loan repaid after {} payments", next_index);
            LoanRepayed { token_id, borrower }.publish(env);
        }
        Ok(())
    }

    /// Lender cancels a loan that was never taken, recovering any principal in custody.
    pub fn liquidate_loan(env: &Env, caller: Address, token_id: BytesN<32>) -> Result<(), Error> {
        let state = Self::require_activated(env)?;
        let mut record = CarbonLoanStorage::get_loan(env, &token_id)?;
        let loan = LoanFields::new(env, &state, token_id.clone());
        let lender = loan.lender();
        Self::require_caller(env, &caller, &lender)?;
        require_state(loan.state()?, &[LoanState::Created, LoanState::Funded])?;

        let amount = record.custody_balance;
        state.settlement.release(env, &lender, amount)?;
        record.custody_balance = 0;
        CarbonLoanStorage::set_loan(env, &token_id, &record);
        loan.set_amount(&NYX_LOAN_BALANCE, 0)?;
        loan.set_state(LoanState::Liquidated);

        log!(env, "loan liquidated, returned {}", amount);
        LoanLiquidated {
            token_id,
            initiator: caller,
            from: env.current_contract_address(),
            to: lender,
            amount,
            success: true,
            data: Bytes::new(env),
        }
        .publish(env);
        Ok(())
    }

    /// Assign the borrower before the loan is taken. Admin-only.
    pub fn set_borrower(env: &Env, token_id: BytesN<32>, borrower: Address) -> Result<(), Error> {
        Self::require_admin(env);
        let state = Self::require_activated(env)?;
        CarbonLoanStorage::get_loan(env, &token_id)?;
        let loan = LoanFields::new(env, &state, token_id);
        require_state(loan.state()?, &[LoanState::Created, LoanState::Funded])?;
        loan.set_address(&NYX_BORROWER, borrower);
        Ok(())
    }

    /// Replace the lender of a loan nobody has funded yet and move the loan
    /// token to them. Admin-only.
    pub fn set_lender(env: &Env, token_id: BytesN<32>, lender: Address) -> Result<(), Error> {
        Self::require_admin(env);
        let state = Self::require_activated(env)?;
        CarbonLoanStorage::get_loan(env, &token_id)?;
        let loan = LoanFields::new(env, &state, token_id.clone());
        require_state(loan.state()?, &[LoanState::Created])?;
        loan.store.transfer(&token_id, &lender);
        loan.set_address(&NYX_LENDER, lender);
        Ok(())
    }

    /// Write a raw metadata entry for a loan. Admin-only.
    pub fn set_loan_data(
        env: &Env,
        token_id: BytesN<32>,
        key: BytesN<32>,
        value: MetadataValue,
    ) -> Result<(), Error> {
        Self::require_admin(env);
        let state = Self::require_activated(env)?;
        CarbonLoanStorage::get_loan(env, &token_id)?;
        LoanMetadataClient::new(env, &state.metadata).set_data(&token_id, &key, &value);
        Ok(())
    }

    /// Append a verified project to the loan and return its index. Admin-only.
    pub fn add_verified_project(
        env: &Env,
        token_id: BytesN<32>,
        project: VerifiedProject,
    ) -> Result<u32, Error> {
        Self::require_admin(env);
        let state = Self::require_activated(env)?;
        CarbonLoanStorage::get_loan(env, &token_id)?;
        if project.units <= 0 {
            return Err(Error::InvalidMetadataValue);
        }
        let loan = LoanFields::new(env, &state, token_id.clone());
        let index = loan.project_count()?;
        let len = index.checked_add(1).ok_or(Error::ArithmeticError)?;

        let mut field_keys = Vec::new(env);
        let mut values = Vec::new(env);
        for list in PROJECT_LIST_KEYS.iter() {
            field_keys.push_back(keys::key(env, list));
            values.push_back(MetadataValue::UInt256(U256::from_u32(env, len)));
        }
        let element = |list: &[u8; 32]| keys::element_key(env, list, index);
        field_keys.push_back(element(&NYX_VERIFIED_PROJECT_NAMES));
        values.push_back(MetadataValue::String(project.name.clone()));
        field_keys.push_back(element(&NYX_VERIFIED_PROJECT_LINKS));
        values.push_back(MetadataValue::String(project.link.clone()));
        field_keys.push_back(element(&NYX_VERIFIED_PROJECT_UNITS));
        values.push_back(MetadataValue::Int256(I256::from_i128(env, project.units)));
        field_keys.push_back(element(&NYX_VERIFIED_PROJECT_GEOGRAPHIC_IDENTIFIERS));
        values.push_back(MetadataValue::String(project.geographic_identifier.clone()));
        field_keys.push_back(element(&NYX_VERIFIED_PROJECT_VERIFICATION_LINKS));
        values.push_back(MetadataValue::String(project.verification_link.clone()));
        loan.store.set_data_batch(&token_id, &field_keys, &values);

        ProjectAdded {
            token_id,
            name: project.name,
            link: project.link,
            units: project.units,
            geographic_identifier: project.geographic_identifier,
            verification_link: project.verification_link,
            index,
        }
        .publish(env);
        Ok(index)
    }

    pub fn get_verified_project(
        env: &Env,
        token_id: BytesN<32>,
        index: u32,
    ) -> Result<VerifiedProject, Error> {
        let state = CarbonLoanStorage::get_state(env);
        CarbonLoanStorage::get_loan(env, &token_id)?;
        LoanFields::new(env, &state, token_id).project(index)
    }

    pub fn verified_project_count(env: &Env, token_id: BytesN<32>) -> Result<u32, Error> {
        let state = CarbonLoanStorage::get_state(env);
        CarbonLoanStorage::get_loan(env, &token_id)?;
        LoanFields::new(env, &state, token_id).project_count()
    }

    /// Overwrite one attribute of a verified project. `key` selects the
    /// attribute by its list key. Admin-only.
    pub fn update_verified_project_element(
        env: &Env,
        token_id: BytesN<32>,
        index: u32,
        key: BytesN<32>,
        value: MetadataValue,
    ) -> Result<(), Error> {
        Self::require_admin(env);
        let state = Self::require_activated(env)?;
        CarbonLoanStorage::get_loan(env, &token_id)?;
        let list = keys::project_list_key(&key).ok_or(Error::InvalidMetadataKey)?;
        let loan = LoanFields::new(env, &state, token_id.clone());
        if index >= loan.project_count()? {
            return Err(Error::ProjectNotFound);
        }
        let valid = if list == NYX_VERIFIED_PROJECT_UNITS {
            value.units(env).is_some_and(|units| units > 0)
        } else {
            value.is_text()
        };
        if !valid {
            return Err(Error::InvalidMetadataValue);
        }

        loan.store
            .set_data(&token_id, &keys::element_key(env, &list, index), &value);
        ProjectElementUpdated {
            token_id,
            index,
            key,
            value,
        }
        .publish(env);
        Ok(())
    }

    pub fn loan(env: &Env, token_id: BytesN<32>) -> Result<LoanView, Error> {
        let state = CarbonLoanStorage::get_state(env);
        let record = CarbonLoanStorage::get_loan(env, &token_id)?;
        let loan = LoanFields::new(env, &state, token_id.clone());
        Ok(LoanView {
            lender: loan.lender(),
            borrower: loan.borrower()?,
            state: loan.state()?,
            initial_loan_amount: loan.amount(&NYX_INITIAL_LOAN_AMOUNT)?,
            loan_balance: loan.amount(&NYX_LOAN_BALANCE)?,
            payment_index: loan.payment_index()?,
            carbon_credits_balance: loan.amount(&NYX_CARBON_CREDITS_BALANCE)?,
            custody_balance: record.custody_balance,
            terms: record.terms,
            token_id,
        })
    }

    pub fn loan_state(env: &Env, token_id: BytesN<32>) -> Result<LoanState, Error> {
        let state = CarbonLoanStorage::get_state(env);
        CarbonLoanStorage::get_loan(env, &token_id)?;
        LoanFields::new(env, &state, token_id).state()
    }

    pub fn loan_balance(env: &Env, token_id: BytesN<32>) -> Result<i128, Error> {
        let state = CarbonLoanStorage::get_state(env);
        CarbonLoanStorage::get_loan(env, &token_id)?;
        LoanFields::new(env, &state, token_id).amount(&NYX_LOAN_BALANCE)
    }

    pub fn payment_index(env: &Env, token_id: BytesN<32>) -> Result<u32, Error> {
        let state = CarbonLoanStorage::get_state(env);
        CarbonLoanStorage::get_loan(env, &token_id)?;
        LoanFields::new(env, &state, token_id).payment_index()
    }

    /// Principal currently held by the contract for the loan
    pub fn custody_balance(env: &Env, token_id: BytesN<32>) -> Result<i128, Error> {
        Ok(CarbonLoanStorage::get_loan(env, &token_id)?.custody_balance)
    }

    fn installment(loan: &LoanFields, terms: &LoanTerms) -> Result<(i128, i128), Error> {
        let balance = loan.amount(&NYX_LOAN_BALANCE)?;
        let remaining_periods = terms
            .amortization_period_in_months
            .saturating_sub(loan.payment_index()?)
            .max(1);
        math::calculate_monthly_payment(balance, remaining_periods, terms.transaction_bps)
    }

    fn quote(state: &CarbonLoanStorage, loan: &LoanFields) -> Result<SwapQuote, Error> {
        let credits_staked = loan.amount(&NYX_CARBON_CREDITS_BALANCE)?;
        let principal = loan.amount(&NYX_INITIAL_LOAN_AMOUNT)?;
        let (profit, profit_bps) =
            math::calculate_profit(credits_staked, state.carbon_credit_price.price, principal)?;
        Ok(SwapQuote {
            price: state.carbon_credit_price.clone(),
            credits_staked,
            profit,
            profit_bps,
        })
    }

    /// Deliver the pledged credits to the lender as registry records and close the loan.
    fn settle_swap(
        env: &Env,
        state: &CarbonLoanStorage,
        loan: &LoanFields,
        record: &mut LoanRecord,
        quote: SwapQuote,
    ) -> Result<(), Error> {
        let registry = CarbonCreditRegistryClient::new(env, &state.credit_registry);
        let lender = loan.lender();
        let project_count = loan.project_count()?;
        if project_count == 0 {
            if quote.credits_staked > 0 {
                let unverified = String::from_str(env, "");
                registry.mint(
                    &lender,
                    &unverified,
                    &unverified,
                    &quote.credits_staked,
                    &unverified,
                );
            }
        } else {
            for index in 0..project_count {
                let project = loan.project(index)?;
                registry.mint(
                    &lender,
                    &project.name,
                    &project.link,
                    &project.units,
                    &project.geographic_identifier,
                );
            }
        }

        loan.store.set_data_batch(
            &loan.token_id,
            &vec![
                env,
                keys::key(env, &NYX_LOAN_BALANCE),
                keys::key(env, &NYX_CARBON_CREDITS_BALANCE),
                keys::key(env, &NYX_LOAN_STATUS),
            ],
            &vec![
                env,
                amount_value(env, 0)?,
                amount_value(env, 0)?,
                state_value(env, LoanState::Swapped),
            ],
        );
        record.swap_quote = Some(quote.clone());
        CarbonLoanStorage::set_loan(env, &loan.token_id, record);

        log!(env, "loan swapped at profit bps {}", quote.profit_bps);
        LoanSwapped {
            token_id: loan.token_id.clone(),
            credits_staked: quote.credits_staked,
            profit: quote.profit,
            profit_bps: quote.profit_bps,
        }
        .publish(env);
        Ok(())
    }

    fn require_activated(env: &Env) -> Result<CarbonLoanStorage, Error> {
        let state = CarbonLoanStorage::get_state(env);
        if !state.activated {
            return Err(Error::NotActivated);
        }
        Ok(state)
    }

    /// Authenticate `caller` and check it holds the expected role
    fn require_caller(env: &Env, caller: &Address, expected: &Address) -> Result<(), Error> {
        caller.require_auth();
        if caller != expected {
            log!(env, "unauthorized caller {}", caller.clone());
            return Err(Error::Unauthorized);
        }
        Ok(())
    }

    /// Set the admin address. Can only be called once.
    fn set_admin(env: &Env, admin: &Address) {
        if env.storage().instance().has(&ADMIN_KEY) {
            panic!("admin already set");
        }
        env.storage().instance().set(&ADMIN_KEY, admin);
    }

    fn require_admin(env: &Env) {
        let admin = Self::admin(env).expect("admin not set");
        admin.require_auth();
    }
}

#[contractimpl]
impl IsSwapEvaluator for CarbonLoanContract {
    fn set_carbon_credit_price(env: &Env, price: i128) -> Result<(), Error> {
        Self::require_admin(env);
        if price < 0 {
            return Err(Error::ValueNotPositive);
        }
        let mut state = CarbonLoanStorage::get_state(env);
        let timestamp = env.ledger().timestamp();
        state.carbon_credit_price = PriceSnapshot { price, timestamp };
        CarbonLoanStorage::set_state(env, &state);

        CarbonCreditPriceUpdated { price, timestamp }.publish(env);
        Ok(())
    }

    fn carbon_credit_price(env: &Env) -> PriceSnapshot {
        CarbonLoanStorage::get_state(env).carbon_credit_price
    }

    fn evaluate_swap_state(env: &Env, token_id: BytesN<32>) -> Result<SwapDecision, Error> {
        Self::require_admin(env);
        let state = Self::require_activated(env)?;
        let mut record = CarbonLoanStorage::get_loan(env, &token_id)?;
        let loan = LoanFields::new(env, &state, token_id.clone());
        require_state(loan.state()?, &[LoanState::Taken])?;

        let quote = Self::quote(&state, &loan)?;
        let decision = swap::classify(quote.profit_bps);
        match decision {
            SwapDecision::NotSwappable => {
                LoanNotSwappable {
                    token_id,
                    credits_staked: quote.credits_staked,
                    profit: quote.profit,
                    profit_bps: quote.profit_bps,
                }
                .publish(env);
            }
            SwapDecision::Swappable => {
                record.swap_quote = Some(quote.clone());
                CarbonLoanStorage::set_loan(env, &token_id, &record);
                loan.set_state(LoanState::Swappable);
                log!(env, "loan swappable at profit bps {}", quote.profit_bps);
                LoanSwappable {
                    token_id,
                    credits_staked: quote.credits_staked,
                    profit: quote.profit,
                    profit_bps: quote.profit_bps,
                }
                .publish(env);
            }
            SwapDecision::Swapped => Self::settle_swap(env, &state, &loan, &mut record, quote)?,
        }
        Ok(decision)
    }

    fn swap_quote(env: &Env, token_id: BytesN<32>) -> Result<Option<SwapQuote>, Error> {
        Ok(CarbonLoanStorage::get_loan(env, &token_id)?.swap_quote)
    }

    fn execute_swap(env: &Env, token_id: BytesN<32>) -> Result<SwapOutcome, Error> {
        Self::require_admin(env);
        let state = Self::require_activated(env)?;
        let mut record = CarbonLoanStorage::get_loan(env, &token_id)?;
        let loan = LoanFields::new(env, &state, token_id.clone());
        require_state(loan.state()?, &[LoanState::Swappable])?;

        let quote = Self::quote(&state, &loan)?;
        if quote.profit_bps < swap::SWAPPABLE_PROFIT_BPS {
            // returned as a value so the reversal to Taken is kept
            record.swap_quote = None;
            CarbonLoanStorage::set_loan(env, &token_id, &record);
            loan.set_state(LoanState::Taken);
            log!(env, "loan no longer swappable at profit bps {}", quote.profit_bps);
            LoanNoLongerSwappable {
                token_id,
                profit_bps: quote.profit_bps,
            }
            .publish(env);
            return Ok(SwapOutcome::NoLongerSwappable);
        }

        Self::settle_swap(env, &state, &loan, &mut record, quote)?;
        Ok(SwapOutcome::Swapped)
    }
}

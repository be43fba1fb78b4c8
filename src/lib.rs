#![no_std]
#![deny(unsafe_code)]
#![deny(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, log, symbol_short, token, Address, Bytes,
    BytesN, Env, String, Symbol, Vec,
};

pub mod access;
pub mod allowlist;
pub mod external;
pub mod fees;
pub mod lock;
pub mod sale;
pub mod storage;
pub mod supply;

use crate::external::{MetadataRendererClient, TokenRegistryClient};
use crate::lock::WithdrawLock;

/// Contract error codes. Auth failures are signaled by host panic (require_auth).
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[repr(u32)]
pub enum DropError {
    /// Caller lacks the required role (or admin).
    Unauthorized = 1,
    /// Public sale is closed.
    SaleInactive = 2,
    /// Presale is closed.
    PresaleInactive = 3,
    /// Public sale is active but its price is zero.
    PriceNotSet = 4,
    /// Payment does not equal the amount owed.
    WrongPrice = 5,
    /// Purchase would exceed the per-address cap or the allowlist entitlement.
    AddressCapExceeded = 6,
    /// Mint would exceed the edition size.
    OverCap = 7,
    /// Allowlist proof does not match the presale root.
    NotAllowlisted = 8,
    /// `initialize` was already called.
    AlreadyInitialized = 9,
    /// royalty_bps exceeded MAX_ROYALTY_BPS (50%).
    RoyaltyTooHigh = 10,
    /// Contract has not been initialized.
    NotInitialized = 11,
    /// Mint of zero editions.
    ZeroQuantity = 12,
    /// Negative price or amount.
    InvalidAmount = 13,
    /// Fee policy returned more than 10000 bps.
    InvalidFeeBps = 14,
    /// Token registry assigned ids other than the ones reserved.
    RegistryOutOfSync = 15,
    /// A withdrawal is already executing.
    WithdrawInProgress = 16,
    /// Caller does not own the token.
    NotTokenOwner = 17,
}

// ── Event symbols ────────────────────────────────────────────
const EVENT_INIT: Symbol = symbol_short!("init");
const EVENT_SALE: Symbol = symbol_short!("sale");
const EVENT_SALE_CONFIG: Symbol = symbol_short!("sale_cfg");
const EVENT_FUNDS_RECIPIENT: Symbol = symbol_short!("funds_to");
const EVENT_OWNER_SET: Symbol = symbol_short!("owner_set");
const EVENT_RENDERER_SET: Symbol = symbol_short!("renderer");
const EVENT_ROLE_GRANTED: Symbol = symbol_short!("role_add");
const EVENT_ROLE_REVOKED: Symbol = symbol_short!("role_rem");
const EVENT_ADMIN_MINT: Symbol = symbol_short!("adm_mint");
const EVENT_AIRDROP: Symbol = symbol_short!("airdrop");
const EVENT_WITHDRAWN: Symbol = symbol_short!("withdrawn");
const EVENT_BURN: Symbol = symbol_short!("burn");

pub const BPS_DENOMINATOR: i128 = 10_000;

/// Maximum secondary royalty in basis points (50%).
pub const MAX_ROYALTY_BPS: u32 = 5_000;

/// Contract version identifier. Bumped when storage or semantics change.
pub const CONTRACT_VERSION: u32 = 1;

// ── Data structures ──────────────────────────────────────────

#[contracttype]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Satisfies every role check and manages role grants.
    Admin = 0,
    /// May mint and airdrop without payment.
    Minter = 1,
    /// May change the sale configuration and funds recipient, and withdraw.
    SalesManager = 2,
}

/// Sale phase derived from the two activation flags; never stored.
#[contracttype]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SalePhase {
    Inactive = 0,
    PublicOnly = 1,
    PresaleOnly = 2,
    Both = 3,
}

/// Sale settings. Always replaced as a whole.
/// public_sale_price: payment-token units per edition.
/// max_per_address: public-sale cap per buyer (0 = uncapped).
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct SaleConfiguration {
    pub public_sale_active: bool,
    pub presale_active: bool,
    pub public_sale_price: i128,
    pub max_per_address: u32,
    pub presale_merkle_root: BytesN<32>,
}

/// Fixed at initialization apart from `funds_recipient`.
/// edition_size: 0 = open edition.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct IssuanceConfig {
    pub edition_size: u64,
    pub royalty_bps: u32,
    pub funds_recipient: Address,
}

/// Contracts the drop delegates to.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Collaborators {
    pub token_registry: Address,
    pub metadata_renderer: Address,
    pub fee_policy: Address,
    /// Asset all prices and withdrawals are denominated in.
    pub payment_token: Address,
}

/// Arguments to `initialize`.
#[contracttype]
#[derive(Clone, Debug)]
pub struct DropParams {
    pub name: String,
    pub symbol: String,
    pub owner: Address,
    pub funds_recipient: Address,
    pub edition_size: u64,
    pub royalty_bps: u32,
    pub metadata_renderer: Address,
    pub renderer_init: Bytes,
    pub token_registry: Address,
    pub fee_policy: Address,
    pub payment_token: Address,
}

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct SaleDetails {
    pub public_sale_active: bool,
    pub presale_active: bool,
    pub public_sale_price: i128,
    pub max_per_address: u32,
    pub presale_merkle_root: BytesN<32>,
    pub total_minted: u64,
    /// 0 = open edition.
    pub max_supply: u64,
}

/// Audit record published with every successful purchase.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct SaleRecord {
    pub buyer: Address,
    pub quantity: u64,
    pub price_per_token: i128,
    pub first_token_id: u64,
}

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct AddressMintDetails {
    pub total_mints: u64,
    pub presale_mints: u64,
    pub public_mints: u64,
}

/// Outcome of a withdrawal: the fee leg and the issuer's remainder.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct FeeSplit {
    pub fee_recipient: Address,
    pub fee_bps: u32,
    pub fee_amount: i128,
    pub remainder: i128,
}

// ── Contract ─────────────────────────────────────────────────
#[contract]
pub struct EditionDrop;

#[contractimpl]
impl EditionDrop {
    fn validate_sale_config(config: &SaleConfiguration) -> Result<(), DropError> {
        if config.public_sale_price < 0 {
            return Err(DropError::InvalidAmount);
        }
        Ok(())
    }

    /// Log why an operation was refused and hand the error back.
    fn rejected(env: &Env, op: Symbol, err: DropError) -> DropError {
        let code = err as u32;
        log!(env, "rejected", op, code);
        err
    }

    /// Mint through the registry and check it assigned the reserved ids.
    fn issue(
        env: &Env,
        registry: &Address,
        to: &Address,
        quantity: u64,
        expected_first: u64,
    ) -> Result<(), DropError> {
        let first = TokenRegistryClient::new(env, registry).mint(to, &quantity);
        if first != expected_first {
            return Err(DropError::RegistryOutOfSync);
        }
        Ok(())
    }

    fn collect_payment(env: &Env, payment_token: &Address, buyer: &Address, value: i128) {
        if value > 0 {
            token::Client::new(env, payment_token).transfer(
                buyer,
                &env.current_contract_address(),
                &value,
            );
        }
    }

    // ── Initialization ────────────────────────────────────────

    /// One-time setup. Stores the issuance config, collaborators and initial
    /// sale configuration, grants `Admin` to `owner` and initializes the
    /// metadata renderer. The owner must authorize.
    pub fn initialize(
        env: Env,
        params: DropParams,
        sale_config: SaleConfiguration,
    ) -> Result<(), DropError> {
        if storage::is_initialized(&env) {
            return Err(DropError::AlreadyInitialized);
        }
        params.owner.require_auth();

        if params.royalty_bps > MAX_ROYALTY_BPS {
            return Err(DropError::RoyaltyTooHigh);
        }
        Self::validate_sale_config(&sale_config)?;

        storage::set_issuance(
            &env,
            &IssuanceConfig {
                edition_size: params.edition_size,
                royalty_bps: params.royalty_bps,
                funds_recipient: params.funds_recipient.clone(),
            },
        );
        storage::set_collaborators(
            &env,
            &Collaborators {
                token_registry: params.token_registry.clone(),
                metadata_renderer: params.metadata_renderer.clone(),
                fee_policy: params.fee_policy.clone(),
                payment_token: params.payment_token.clone(),
            },
        );
        storage::set_collection_info(&env, &params.name, &params.symbol);
        storage::set_owner(&env, &params.owner);
        storage::set_sale_config(&env, &sale_config);
        storage::set_total_minted(&env, 0);
        access::grant(&env, Role::Admin, &params.owner);
        storage::bump_instance(&env);

        MetadataRendererClient::new(&env, &params.metadata_renderer)
            .initialize(&params.renderer_init);

        env.events().publish(
            (EVENT_INIT, params.owner.clone()),
            (params.edition_size, params.royalty_bps, params.funds_recipient),
        );
        Ok(())
    }

    // ── Administration ────────────────────────────────────────

    /// Replace the sale configuration. Admin or sales manager.
    pub fn set_sale_configuration(
        env: Env,
        caller: Address,
        config: SaleConfiguration,
    ) -> Result<(), DropError> {
        caller.require_auth();
        storage::issuance(&env)?;
        access::require_role_or_admin(&env, &caller, Role::SalesManager)?;
        Self::validate_sale_config(&config)?;

        storage::set_sale_config(&env, &config);
        env.events().publish((EVENT_SALE_CONFIG, caller), config);
        storage::bump_instance(&env);
        Ok(())
    }

    /// Change where the issuer's share of withdrawals goes. Admin or sales manager.
    pub fn set_funds_recipient(
        env: Env,
        caller: Address,
        recipient: Address,
    ) -> Result<(), DropError> {
        caller.require_auth();
        let mut issuance = storage::issuance(&env)?;
        access::require_role_or_admin(&env, &caller, Role::SalesManager)?;

        issuance.funds_recipient = recipient.clone();
        storage::set_issuance(&env, &issuance);
        env.events()
            .publish((EVENT_FUNDS_RECIPIENT, caller), recipient);
        storage::bump_instance(&env);
        Ok(())
    }

    /// Set the display owner. Admin only; does not grant any role.
    pub fn set_owner(env: Env, caller: Address, owner: Address) -> Result<(), DropError> {
        caller.require_auth();
        storage::issuance(&env)?;
        access::require_admin(&env, &caller)?;

        let previous = storage::owner(&env)?;
        storage::set_owner(&env, &owner);
        env.events()
            .publish((EVENT_OWNER_SET, caller), (previous, owner));
        storage::bump_instance(&env);
        Ok(())
    }

    /// Point token and contract URIs at a new renderer, initializing it with `init`. Admin only.
    pub fn set_metadata_renderer(
        env: Env,
        caller: Address,
        renderer: Address,
        init: Bytes,
    ) -> Result<(), DropError> {
        caller.require_auth();
        let mut collaborators = storage::collaborators(&env)?;
        access::require_admin(&env, &caller)?;

        collaborators.metadata_renderer = renderer.clone();
        storage::set_collaborators(&env, &collaborators);
        MetadataRendererClient::new(&env, &renderer).initialize(&init);
        env.events().publish((EVENT_RENDERER_SET, caller), renderer);
        storage::bump_instance(&env);
        Ok(())
    }

    /// Grant `role` to `account`. Admin only. Idempotent.
    pub fn grant_role(
        env: Env,
        caller: Address,
        role: Role,
        account: Address,
    ) -> Result<(), DropError> {
        caller.require_auth();
        storage::issuance(&env)?;
        access::require_admin(&env, &caller)?;

        if access::grant(&env, role, &account) {
            env.events()
                .publish((EVENT_ROLE_GRANTED, caller), (role, account));
        }
        storage::bump_instance(&env);
        Ok(())
    }

    /// Revoke `role` from `account`. Admin only. Idempotent; the last admin cannot be revoked.
    pub fn revoke_role(
        env: Env,
        caller: Address,
        role: Role,
        account: Address,
    ) -> Result<(), DropError> {
        caller.require_auth();
        storage::issuance(&env)?;
        access::require_admin(&env, &caller)?;

        if access::revoke(&env, role, &account)? {
            env.events()
                .publish((EVENT_ROLE_REVOKED, caller), (role, account));
        }
        storage::bump_instance(&env);
        Ok(())
    }

    /// Whether `account` holds `role` directly (admins are not reported as holding other roles).
    pub fn has_role(env: Env, role: Role, account: Address) -> bool {
        storage::has_role(&env, role, &account)
    }

    // ── Minting ───────────────────────────────────────────────

    /// Buy `quantity` editions in the public sale, paying exactly `value`
    /// (price × quantity) in the payment token. Returns the first token id.
    pub fn purchase(
        env: Env,
        buyer: Address,
        quantity: u64,
        value: i128,
    ) -> Result<u64, DropError> {
        buyer.require_auth();
        let op = symbol_short!("purchase");
        let issuance = storage::issuance(&env)?;
        let config = storage::sale_config(&env)?;
        let collaborators = storage::collaborators(&env)?;

        let prior = storage::purchased_by(&env, &buyer);
        let owed = sale::admit_public(&config, quantity, prior)
            .map_err(|e| Self::rejected(&env, op.clone(), e))?;
        sale::require_exact_payment(owed, value)
            .map_err(|e| Self::rejected(&env, op.clone(), e))?;
        let first_token_id = supply::reserve(&env, issuance.edition_size, quantity)
            .map_err(|e| Self::rejected(&env, op, e))?;
        storage::add_public_mints(&env, &buyer, quantity);

        Self::collect_payment(&env, &collaborators.payment_token, &buyer, value);
        Self::issue(
            &env,
            &collaborators.token_registry,
            &buyer,
            quantity,
            first_token_id,
        )?;

        env.events().publish(
            (EVENT_SALE, buyer.clone()),
            SaleRecord {
                buyer,
                quantity,
                price_per_token: config.public_sale_price,
                first_token_id,
            },
        );
        storage::bump_instance(&env);
        Ok(first_token_id)
    }

    /// Buy `quantity` editions in the presale. `max_quantity` and
    /// `price_per_token` are the buyer's allowlist entry, proven by `proof`
    /// against the configured Merkle root. Returns the first token id.
    pub fn purchase_presale(
        env: Env,
        buyer: Address,
        quantity: u64,
        max_quantity: u64,
        price_per_token: i128,
        proof: Vec<BytesN<32>>,
        value: i128,
    ) -> Result<u64, DropError> {
        buyer.require_auth();
        let op = symbol_short!("presale");
        let issuance = storage::issuance(&env)?;
        let config = storage::sale_config(&env)?;
        let collaborators = storage::collaborators(&env)?;

        let prior = storage::purchased_by(&env, &buyer);
        let owed = sale::admit_presale(
            &env,
            &config,
            &buyer,
            quantity,
            max_quantity,
            price_per_token,
            prior,
            &proof,
        )
        .map_err(|e| Self::rejected(&env, op.clone(), e))?;
        sale::require_exact_payment(owed, value)
            .map_err(|e| Self::rejected(&env, op.clone(), e))?;
        let first_token_id = supply::reserve(&env, issuance.edition_size, quantity)
            .map_err(|e| Self::rejected(&env, op, e))?;
        storage::add_presale_mints(&env, &buyer, quantity);

        Self::collect_payment(&env, &collaborators.payment_token, &buyer, value);
        Self::issue(
            &env,
            &collaborators.token_registry,
            &buyer,
            quantity,
            first_token_id,
        )?;

        env.events().publish(
            (EVENT_SALE, buyer.clone()),
            SaleRecord {
                buyer,
                quantity,
                price_per_token,
                first_token_id,
            },
        );
        storage::bump_instance(&env);
        Ok(first_token_id)
    }

    /// Mint `quantity` editions to `recipient` without payment. Minter or admin.
    pub fn admin_mint(
        env: Env,
        caller: Address,
        recipient: Address,
        quantity: u64,
    ) -> Result<u64, DropError> {
        caller.require_auth();
        let issuance = storage::issuance(&env)?;
        let collaborators = storage::collaborators(&env)?;
        access::require_role_or_admin(&env, &caller, Role::Minter)?;

        let first_token_id = supply::reserve(&env, issuance.edition_size, quantity)?;
        Self::issue(
            &env,
            &collaborators.token_registry,
            &recipient,
            quantity,
            first_token_id,
        )?;

        env.events().publish(
            (EVENT_ADMIN_MINT, caller, recipient),
            (quantity, first_token_id),
        );
        storage::bump_instance(&env);
        Ok(first_token_id)
    }

    /// Mint one edition to each recipient. Ids are contiguous and follow the
    /// order of `recipients`: recipient `i` receives `first + i`. Minter or admin.
    pub fn admin_airdrop(
        env: Env,
        caller: Address,
        recipients: Vec<Address>,
    ) -> Result<u64, DropError> {
        caller.require_auth();
        let issuance = storage::issuance(&env)?;
        let collaborators = storage::collaborators(&env)?;
        access::require_role_or_admin(&env, &caller, Role::Minter)?;

        let count = u64::from(recipients.len());
        let first_token_id = supply::reserve(&env, issuance.edition_size, count)?;
        let mut next_id = first_token_id;
        for recipient in recipients.iter() {
            Self::issue(&env, &collaborators.token_registry, &recipient, 1, next_id)?;
            next_id += 1;
        }

        env.events()
            .publish((EVENT_AIRDROP, caller), (count, first_token_id));
        storage::bump_instance(&env);
        Ok(first_token_id)
    }

    /// Burn a token the caller owns. Supply already issued stays counted
    /// against the edition size.
    pub fn burn(env: Env, caller: Address, token_id: u64) -> Result<(), DropError> {
        caller.require_auth();
        let collaborators = storage::collaborators(&env)?;
        let registry = TokenRegistryClient::new(&env, &collaborators.token_registry);
        if registry.owner_of(&token_id) != caller {
            return Err(DropError::NotTokenOwner);
        }
        registry.burn(&token_id);
        env.events().publish((EVENT_BURN, caller), token_id);
        storage::bump_instance(&env);
        Ok(())
    }

    // ── Funds ─────────────────────────────────────────────────

    /// Pay out the contract's whole payment-token balance: the protocol fee
    /// first, then the remainder to the funds recipient. Admin or sales manager.
    ///
    /// Either both legs settle or the invocation fails and nothing moves.
    pub fn withdraw(env: Env, caller: Address) -> Result<FeeSplit, DropError> {
        caller.require_auth();
        let issuance = storage::issuance(&env)?;
        let collaborators = storage::collaborators(&env)?;
        access::require_role_or_admin(&env, &caller, Role::SalesManager)?;

        let _lock = WithdrawLock::acquire(&env)?;
        let payment = token::Client::new(&env, &collaborators.payment_token);
        let contract_addr = env.current_contract_address();
        let balance = payment.balance(&contract_addr);
        let split = fees::split(&env, &collaborators.fee_policy, balance)
            .map_err(|e| Self::rejected(&env, symbol_short!("withdraw"), e))?;

        if split.fee_amount > 0 {
            payment.transfer(&contract_addr, &split.fee_recipient, &split.fee_amount);
        }
        if split.remainder > 0 {
            payment.transfer(&contract_addr, &issuance.funds_recipient, &split.remainder);
        }

        env.events().publish(
            (EVENT_WITHDRAWN, caller),
            (
                split.fee_recipient.clone(),
                split.fee_amount,
                issuance.funds_recipient,
                split.remainder,
            ),
        );
        storage::bump_instance(&env);
        Ok(split)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn sale_details(env: Env) -> Result<SaleDetails, DropError> {
        let issuance = storage::issuance(&env)?;
        let config = storage::sale_config(&env)?;
        Ok(SaleDetails {
            public_sale_active: config.public_sale_active,
            presale_active: config.presale_active,
            public_sale_price: config.public_sale_price,
            max_per_address: config.max_per_address,
            presale_merkle_root: config.presale_merkle_root,
            total_minted: storage::total_minted(&env),
            max_supply: issuance.edition_size,
        })
    }

    pub fn sale_configuration(env: Env) -> Result<SaleConfiguration, DropError> {
        storage::sale_config(&env)
    }

    pub fn sale_phase(env: Env) -> Result<SalePhase, DropError> {
        Ok(sale::phase(&storage::sale_config(&env)?))
    }

    /// Editions `account` has bought through either sale phase.
    pub fn minted_per_address(env: Env, account: Address) -> u64 {
        storage::purchased_by(&env, &account)
    }

    pub fn mint_details(env: Env, account: Address) -> AddressMintDetails {
        let public_mints = storage::public_mints(&env, &account);
        let presale_mints = storage::presale_mints(&env, &account);
        AddressMintDetails {
            total_mints: public_mints.saturating_add(presale_mints),
            presale_mints,
            public_mints,
        }
    }

    /// Royalty owed on a secondary sale: `(funds_recipient, sale_price * royalty_bps / 10000)`.
    pub fn royalty_info(env: Env, sale_price: i128) -> Result<(Address, i128), DropError> {
        let issuance = storage::issuance(&env)?;
        let amount = fees::bps_share(sale_price, issuance.royalty_bps)?;
        Ok((issuance.funds_recipient, amount))
    }

    pub fn total_minted(env: Env) -> u64 {
        storage::total_minted(&env)
    }

    pub fn edition_size(env: Env) -> Result<u64, DropError> {
        Ok(storage::issuance(&env)?.edition_size)
    }

    pub fn funds_recipient(env: Env) -> Result<Address, DropError> {
        Ok(storage::issuance(&env)?.funds_recipient)
    }

    pub fn owner(env: Env) -> Result<Address, DropError> {
        storage::owner(&env)
    }

    pub fn name(env: Env) -> Result<String, DropError> {
        storage::name(&env)
    }

    pub fn symbol(env: Env) -> Result<String, DropError> {
        storage::symbol(&env)
    }

    pub fn contract_uri(env: Env) -> Result<String, DropError> {
        let collaborators = storage::collaborators(&env)?;
        Ok(MetadataRendererClient::new(&env, &collaborators.metadata_renderer).contract_uri())
    }

    pub fn token_uri(env: Env, token_id: u64) -> Result<String, DropError> {
        let collaborators = storage::collaborators(&env)?;
        Ok(MetadataRendererClient::new(&env, &collaborators.metadata_renderer).token_uri(&token_id))
    }

    /// Return the current contract version. Used for upgrade compatibility and migration.
    pub fn get_version(env: Env) -> u32 {
        let _ = env;
        CONTRACT_VERSION
    }
}

#[cfg(test)]
mod test_withdraw;

//! Countersign CLI — the off-ledger signing and automation collaborator.
//!
//! Produces key material, computes the exact canonical digests the core
//! verifies, signs endorsements, and can drive a full in-process demo.
//! No protocol logic lives here: digest construction is the library's.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use countersign_core::{Authority, DeployConfig};
use countersign_crypto::{generate_keypair, keypair_from_seed, sign_digest};
use countersign_endorse::{
    airdrop_payload, mint_payload, proposal_payload, EndorsementMessage, SignedEndorsement,
    SigningDomain,
};
use countersign_types::{
    ActionKind, Amount, Digest32, KeyPair, Principal, PrivateKey, Role, SystemClock, Timestamp,
};
use serde_json::json;

#[derive(Parser)]
#[command(name = "countersign", about = "Countersign authorization core tooling")]
struct Cli {
    /// Log level filter (overrides RUST_LOG).
    #[arg(long, env = "CSG_LOG", default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a key pair (random, or deterministic from a seed).
    Keygen {
        /// 32-byte hex seed for deterministic derivation.
        #[arg(long)]
        seed: Option<String>,
    },
    /// Derive the principal for a public key.
    Principal {
        #[arg(long)]
        public_key: String,
    },
    /// Compute payload and endorsement digests without signing.
    Digest {
        #[command(flatten)]
        domain: DomainArgs,
        #[command(flatten)]
        message: MessageArgs,
        #[command(subcommand)]
        payload: PayloadCommand,
    },
    /// Sign an endorsement.
    Sign {
        /// 32-byte hex private key of an endorser.
        #[arg(long, env = "CSG_PRIVATE_KEY", hide_env_values = true)]
        private_key: String,
        #[command(flatten)]
        domain: DomainArgs,
        #[command(flatten)]
        message: MessageArgs,
        #[command(subcommand)]
        payload: PayloadCommand,
    },
    /// Run an in-process end-to-end scenario and print the event log.
    Demo {
        /// Optional TOML deployment config.
        #[arg(long)]
        config: Option<std::path::PathBuf>,
    },
}

/// The signing domain an endorsement is bound to. Must match the deployed
/// instance byte for byte.
#[derive(Args)]
struct DomainArgs {
    #[arg(long, env = "CSG_DOMAIN_NAME")]
    domain_name: String,

    #[arg(long, default_value = "1", env = "CSG_DOMAIN_VERSION")]
    domain_version: String,

    #[arg(long, default_value_t = 0, env = "CSG_REALM")]
    realm: u64,

    /// Principal identifying the verifying authority instance.
    #[arg(long, env = "CSG_AUTHORITY")]
    authority: String,
}

impl DomainArgs {
    fn build(&self) -> Result<SigningDomain> {
        let authority: Principal = self
            .authority
            .parse()
            .map_err(|e| anyhow!("invalid authority principal: {e}"))?;
        Ok(SigningDomain::new(
            self.domain_name.clone(),
            self.domain_version.clone(),
            self.realm,
            authority,
        ))
    }
}

#[derive(Args)]
struct MessageArgs {
    /// The on-ledger caller the endorsement is bound to.
    #[arg(long)]
    caller: String,

    /// The caller's current nonce (read it from the `nonces` view).
    #[arg(long)]
    nonce: u64,

    /// Endorsement validity deadline, Unix seconds (inclusive).
    #[arg(long)]
    deadline: u64,
}

#[derive(Subcommand)]
enum PayloadCommand {
    /// Endorse a mint of `amount` to `to`.
    Mint {
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: u128,
    },
    /// Endorse a batch airdrop (comma-separated, positionally paired).
    Airdrop {
        #[arg(long, value_delimiter = ',')]
        recipients: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        amounts: Vec<u128>,
    },
    /// Endorse a proposal submission.
    Proposal {
        #[arg(long)]
        title: String,
        #[arg(long)]
        metadata_ref: String,
        #[arg(long)]
        amount: u128,
        /// Review deadline of the proposal, Unix seconds.
        #[arg(long)]
        review_deadline: u64,
    },
}

impl PayloadCommand {
    fn action(&self) -> ActionKind {
        match self {
            Self::Mint { .. } => ActionKind::Mint,
            Self::Airdrop { .. } => ActionKind::Airdrop,
            Self::Proposal { .. } => ActionKind::CreateProposal,
        }
    }

    fn digest(&self) -> Result<Digest32> {
        match self {
            Self::Mint { to, amount } => {
                let to: Principal = to.parse().map_err(|e| anyhow!("invalid recipient: {e}"))?;
                Ok(mint_payload(&to, Amount::new(*amount)))
            }
            Self::Airdrop {
                recipients,
                amounts,
            } => {
                if recipients.len() != amounts.len() {
                    bail!(
                        "airdrop lists must pair up: {} recipients, {} amounts",
                        recipients.len(),
                        amounts.len()
                    );
                }
                let recipients: Vec<Principal> = recipients
                    .iter()
                    .map(|r| r.parse().map_err(|e| anyhow!("invalid recipient: {e}")))
                    .collect::<Result<_>>()?;
                let amounts: Vec<Amount> = amounts.iter().map(|a| Amount::new(*a)).collect();
                Ok(airdrop_payload(&recipients, &amounts))
            }
            Self::Proposal {
                title,
                metadata_ref,
                amount,
                review_deadline,
            } => Ok(proposal_payload(
                title,
                metadata_ref,
                Amount::new(*amount),
                Timestamp::new(*review_deadline),
            )),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    countersign_utils::init_tracing(&cli.log);

    match cli.command {
        Command::Keygen { seed } => keygen(seed),
        Command::Principal { public_key } => principal(&public_key),
        Command::Digest {
            domain,
            message,
            payload,
        } => digest(&domain, &message, &payload),
        Command::Sign {
            private_key,
            domain,
            message,
            payload,
        } => sign(&private_key, &domain, &message, &payload),
        Command::Demo { config } => demo(config.as_deref()),
    }
}

fn keygen(seed: Option<String>) -> Result<()> {
    let keypair = match seed {
        Some(seed) => {
            let bytes = parse_hex32(&seed).context("seed must be 32 bytes of hex")?;
            keypair_from_seed(&bytes)
        }
        None => generate_keypair(),
    };
    print_keypair(&keypair)
}

fn principal(public_key: &str) -> Result<()> {
    let bytes = parse_hex32(public_key).context("public key must be 32 bytes of hex")?;
    let principal = Principal::from_public_key(&countersign_types::PublicKey(bytes));
    println!("{}", json!({ "principal": principal.to_string() }));
    Ok(())
}

fn digest(domain: &DomainArgs, message: &MessageArgs, payload: &PayloadCommand) -> Result<()> {
    let (message, payload_digest, digest) = build_digest(domain, message, payload)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "action": message.action.name(),
            "caller": message.caller.to_string(),
            "nonce": message.nonce,
            "deadline": message.deadline.as_secs(),
            "payload_digest": payload_digest.to_string(),
            "digest": digest.to_string(),
        }))?
    );
    Ok(())
}

fn sign(
    private_key: &str,
    domain: &DomainArgs,
    message: &MessageArgs,
    payload: &PayloadCommand,
) -> Result<()> {
    let key_bytes = parse_hex32(private_key).context("private key must be 32 bytes of hex")?;
    let private = PrivateKey(key_bytes);
    let public = countersign_crypto::public_from_private(&private);

    let (message, _payload_digest, digest) = build_digest(domain, message, payload)?;
    let endorsement = SignedEndorsement {
        public_key: public,
        signature: sign_digest(&digest, &private),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "action": message.action.name(),
            "caller": message.caller.to_string(),
            "nonce": message.nonce,
            "deadline": message.deadline.as_secs(),
            "digest": digest.to_string(),
            "endorsement": endorsement,
            "signer": Principal::from_public_key(&public).to_string(),
        }))?
    );
    Ok(())
}

fn build_digest(
    domain: &DomainArgs,
    message: &MessageArgs,
    payload: &PayloadCommand,
) -> Result<(EndorsementMessage, Digest32, Digest32)> {
    let domain = domain.build()?;
    let caller: Principal = message
        .caller
        .parse()
        .map_err(|e| anyhow!("invalid caller principal: {e}"))?;
    let payload_digest = payload.digest()?;
    let message = EndorsementMessage {
        caller,
        action: payload.action(),
        payload: payload_digest,
        nonce: message.nonce,
        deadline: Timestamp::new(message.deadline),
    };
    let digest = message.digest(&domain);
    Ok((message, payload_digest, digest))
}

/// Drive one deployment end to end: deploy, endorse a mint, run a
/// proposal through review to disbursement, then print the event log.
fn demo(config: Option<&std::path::Path>) -> Result<()> {
    let config: DeployConfig = match config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&raw).context("parsing deploy config")?
        }
        None => DeployConfig {
            name: "Countersign Demo".into(),
            symbol: "CSG".into(),
            cap: Amount::new(1_000_000),
            initial_receiver: None,
            initial_amount: Amount::ZERO,
            approval_threshold: 2,
            rejection_threshold: 2,
            pause_blocks_mint: false,
            domain_version: "1".into(),
            realm: 1,
        },
    };

    let deployer_kp = keypair_from_seed(&[1u8; 32]);
    let deployer = Principal::from_public_key(&deployer_kp.public);
    let mut authority = Authority::new(deployer, config, Box::new(SystemClock))
        .map_err(|e| anyhow!("deploy failed: {e}"))?;

    // The deployer holds Endorser; a separate caller uses the endorsed
    // mint path.
    let caller = Principal::new([2u8; 20]);
    let recipient = Principal::new([3u8; 20]);
    let amount = Amount::new(5_000);
    let deadline = Timestamp::now().offset(3_600);
    let message = EndorsementMessage {
        caller,
        action: ActionKind::Mint,
        payload: mint_payload(&recipient, amount),
        nonce: authority.nonce_of(&caller),
        deadline,
    };
    let endorsement = SignedEndorsement {
        public_key: deployer_kp.public,
        signature: sign_digest(&message.digest(authority.domain()), &deployer_kp.private),
    };
    authority
        .mint_endorsed(&caller, &recipient, amount, deadline, &endorsement)
        .map_err(|e| anyhow!("endorsed mint failed: {e}"))?;

    // A funded proposal: reviewers approve, the pool pays out.
    let reviewers = [Principal::new([10u8; 20]), Principal::new([11u8; 20])];
    for reviewer in reviewers {
        authority
            .grant_role(&deployer, Role::Reviewer, reviewer)
            .map_err(|e| anyhow!("grant failed: {e}"))?;
    }
    let proposer = Principal::new([4u8; 20]);
    let id = authority
        .create_proposal(
            &proposer,
            "repair the well",
            "ipfs://QmDemo",
            Amount::new(1_200),
            Timestamp::now().offset(86_400),
        )
        .map_err(|e| anyhow!("create failed: {e}"))?;
    authority
        .submit_proposal(&proposer, id)
        .map_err(|e| anyhow!("submit failed: {e}"))?;
    for reviewer in &reviewers {
        authority
            .review(reviewer, id, true)
            .map_err(|e| anyhow!("review failed: {e}"))?;
    }
    authority
        .deposit(&recipient, Amount::new(2_000))
        .map_err(|e| anyhow!("deposit failed: {e}"))?;
    authority
        .disburse(id)
        .map_err(|e| anyhow!("disburse failed: {e}"))?;

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "deployer": deployer.to_string(),
            "proposal": authority.get_proposal(id),
            "pool": authority.pool_balance(),
            "total_supply": authority.total_supply(),
            "events": authority.events(),
        }))?
    );
    Ok(())
}

fn print_keypair(keypair: &KeyPair) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "principal": Principal::from_public_key(&keypair.public).to_string(),
            "public_key": hex::encode(keypair.public.as_bytes()),
            "private_key": hex::encode(keypair.private.0),
        }))?
    );
    Ok(())
}

fn parse_hex32(input: &str) -> Result<[u8; 32]> {
    let bytes = hex::decode(input.trim())?;
    let arr: [u8; 32] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| anyhow!("expected 32 bytes, got {}", bytes.len()))?;
    Ok(arr)
}

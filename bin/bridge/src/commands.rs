//! Subcommand handlers.

use std::{fs, path::Path, sync::Arc};

use alloy_primitives::{Address, hex, utils::format_ether};
use alloy_signer_local::PrivateKeySigner;
use era_bridge_core::{
    AlloyL1Client, BridgeArtifacts, BridgeInitSequencer, FeeEstimate, FinalizerConfig, L1Client,
    L1ClientConfig, LocalTransactionSigner, MailboxClient, PriorityFeeEstimator,
    WethTokenInitializer, WithdrawalService, validate_url,
};
use era_bridge_primitives::{
    BytecodeHash, BytecodeHasher, DeploymentSpec, FinalizeWithdrawalCall, GasParams,
    LocalFeeModel, SenderKind, WithdrawalFinalizer, WithdrawalProof, apply_l1_to_l2_alias,
};
use eyre::{WrapErr, ensure, eyre};
use tracing::{info, warn};

use crate::cli::{
    Commands, DeriveAddressArgs, EstimateCostArgs, FinalizeWithdrawalArgs, HashBytecodeArgs,
    InitBridgesArgs, InitL2WethTokenArgs,
};

/// Runs `command` and prints its result.
pub(crate) async fn run(command: Commands) -> eyre::Result<()> {
    match command {
        Commands::DeriveAddress(args) => println!("{}", derive_address(&args)?),
        Commands::HashBytecode(args) => println!("{}", hash_bytecode(&args)?),
        Commands::EstimateCost(args) => {
            let estimate = estimate_cost(&args).await?;
            println!(
                "base cost: {} wei ({} ETH)",
                estimate.base_cost,
                format_ether(estimate.base_cost)
            );
            println!(
                "value ({} margin): {} wei ({} ETH)",
                estimate.margin,
                estimate.value,
                format_ether(estimate.value)
            );
        }
        Commands::InitBridges(args) => init_bridges(&args).await?,
        Commands::FinalizeWithdrawal(args) => {
            let call = finalize_withdrawal(&args).await?;
            println!("to: {}", call.to);
            println!("calldata: {}", hex::encode_prefixed(&call.calldata));
        }
        Commands::InitL2WethToken(args) => init_l2_weth_token(&args).await?,
    }
    Ok(())
}

pub(crate) fn derive_address(args: &DeriveAddressArgs) -> eyre::Result<Address> {
    let bytecode_hash = BytecodeHash::from_slice(args.bytecode_hash.as_slice())?;
    let deployer = if args.alias {
        apply_l1_to_l2_alias(args.deployer, SenderKind::Contract)
    } else {
        args.deployer
    };
    let spec = DeploymentSpec::new(deployer, bytecode_hash)
        .with_constructor_input(args.constructor_input.clone())
        .with_salt(args.salt.unwrap_or_default());
    Ok(spec.address())
}

pub(crate) fn hash_bytecode(args: &HashBytecodeArgs) -> eyre::Result<BytecodeHash> {
    let hasher =
        args.max_words.map_or_else(BytecodeHasher::default, BytecodeHasher::with_max_words);
    let bytecode = read_hex_file(&args.path)?;
    Ok(hasher.hash(&bytecode)?)
}

fn read_hex_file(path: &Path) -> eyre::Result<Vec<u8>> {
    let contents = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    hex::decode(contents.trim()).wrap_err_with(|| format!("{} is not valid hex", path.display()))
}

pub(crate) async fn estimate_cost(args: &EstimateCostArgs) -> eyre::Result<FeeEstimate> {
    let params = |gas_price| GasParams::new(gas_price, args.l2_gas_limit, args.gas_per_pubdata);

    if args.offline {
        let gas_price =
            args.gas_price.ok_or_else(|| eyre!("--gas-price is required with --offline"))?;
        return Ok(PriorityFeeEstimator::new(LocalFeeModel)
            .estimate(params(gas_price), args.margin)
            .await?);
    }

    let endpoint = args
        .rpc_endpoint
        .clone()
        .ok_or_else(|| eyre!("--rpc-endpoint is required unless --offline is set"))?;
    let mailbox = args
        .mailbox_address
        .ok_or_else(|| eyre!("--mailbox-address is required unless --offline is set"))?;
    let client = Arc::new(AlloyL1Client::new(L1ClientConfig::new(endpoint)));
    let gas_price = match args.gas_price {
        Some(gas_price) => gas_price,
        None => client.gas_price().await?,
    };
    info!(%mailbox, gas_price, "Quoting from mailbox");

    Ok(PriorityFeeEstimator::new(MailboxClient::new(mailbox, client))
        .estimate(params(gas_price), args.margin)
        .await?)
}

async fn init_bridges(args: &InitBridgesArgs) -> eyre::Result<()> {
    let bridge = args.bridge.to_config()?;
    let signer: PrivateKeySigner = args.private_key.parse().wrap_err("invalid private key")?;
    let bytecodes = BridgeArtifacts::load_from_dir(&args.artifacts_dir)?;

    let client = Arc::new(AlloyL1Client::new(
        args.bridge.client_config(&bridge).with_receipt_timeout(args.receipt_timeout),
    ));
    info!(endpoint = %bridge.rpc_endpoint, deployer = %signer.address(), "L1 client initialized");

    let sequencer = BridgeInitSequencer::new(
        bridge,
        args.init_config(),
        client,
        LocalTransactionSigner::new(signer),
    )?;
    let outcome = sequencer.initialize(&bytecodes).await?;

    println!("state: {}", sequencer.state().await);
    println!("publish tx: {}", outcome.publish.tx_hash);
    println!("initialize tx: {}", outcome.initialize.tx_hash);
    println!("L2 bridge implementation: {}", outcome.addresses.bridge_implementation);
    println!("L2 bridge: {}", outcome.addresses.bridge_proxy);
    println!("L2 standard token: {}", outcome.addresses.standard_token);
    println!("L2 token beacon: {}", outcome.addresses.token_beacon);
    Ok(())
}

pub(crate) async fn finalize_withdrawal(
    args: &FinalizeWithdrawalArgs,
) -> eyre::Result<FinalizeWithdrawalCall> {
    let contents = fs::read_to_string(&args.proof)
        .wrap_err_with(|| format!("failed to read {}", args.proof.display()))?;
    let proof: WithdrawalProof =
        serde_json::from_str(&contents).wrap_err("invalid withdrawal proof")?;
    let layout = args.layout.into();

    if args.offline {
        let counterpart = args.bridge.bridge_l2_counterpart_address;
        ensure!(counterpart != Address::ZERO, "--bridge-l2-counterpart-address is required");
        let finalizer = WithdrawalFinalizer::new(args.bridge.bridge_l1_address, counterpart)
            .with_layout(layout);
        return Ok(finalizer.validate(&proof)?);
    }

    let bridge = args.bridge.to_config()?;
    let client = Arc::new(AlloyL1Client::new(args.bridge.client_config(&bridge)));
    let config = match args.mailbox_address {
        Some(mailbox) => FinalizerConfig::default().with_inclusion_check(mailbox),
        None => FinalizerConfig::default(),
    }
    .with_layout(layout);

    let service = WithdrawalService::new(&bridge, &config, client)?;
    Ok(service.prepare_finalization(&proof).await?)
}

async fn init_l2_weth_token(args: &InitL2WethTokenArgs) -> eyre::Result<()> {
    validate_url(&args.rpc_endpoint, "rpc-endpoint")?;
    let signer = args
        .private_key
        .as_deref()
        .map(|key| key.parse::<PrivateKeySigner>().wrap_err("invalid private key"))
        .transpose()?;

    let client = Arc::new(AlloyL1Client::new(args.client_config()));
    let initializer = WethTokenInitializer::new(args.weth_config(), client)?;

    let Some(signer) = signer else {
        let call = initializer.prepare_governance_call().await?;
        println!("{}", serde_json::to_string_pretty(&call)?);
        warn!(gas_price = call.gas_price, "Submit with a gas price no higher than the quote");
        return Ok(());
    };

    let outcome = initializer.submit(&LocalTransactionSigner::new(signer)).await?;
    println!("tx: {}", outcome.tx_hash);
    println!("gas used: {}", outcome.gas_used);
    Ok(())
}

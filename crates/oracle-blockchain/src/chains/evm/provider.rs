//! Signing provider over the configured RPC endpoints.

use std::{num::NonZeroUsize, sync::Arc};

use alloy::{
    network::{Ethereum, EthereumWallet},
    providers::{DynProvider, Provider, ProviderBuilder, WsConnect},
    rpc::client::RpcClient,
    signers::local::{LocalSignerError, PrivateKeySigner},
    transports::{
        BoxTransport, IntoBoxTransport, TransportError,
        http::{Http, reqwest::Url},
        layers::FallbackLayer,
    },
};
use tower::ServiceBuilder;

use crate::{BlockchainConfig, error::BlockchainError};

pub(crate) type BlockchainProvider = Arc<DynProvider<Ethereum>>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Endpoint {
    Http(Url),
    Ws(Url),
}

fn parse_endpoint(raw: &str) -> Option<Endpoint> {
    let url = raw.trim().parse::<Url>().ok()?;
    match url.scheme() {
        "http" | "https" => Some(Endpoint::Http(url)),
        "ws" | "wss" => Some(Endpoint::Ws(url)),
        _ => None,
    }
}

async fn open_transport(endpoint: Endpoint) -> Result<BoxTransport, TransportError> {
    match endpoint {
        Endpoint::Http(url) => Ok(Http::new(url).into_box_transport()),
        Endpoint::Ws(url) => {
            let client = RpcClient::connect_pubsub(WsConnect::new(url.as_str())).await?;
            Ok(client.transport().clone().into_box_transport())
        }
    }
}

fn oracle_wallet(private_key: &str) -> Result<EthereumWallet, BlockchainError> {
    let signer: PrivateKeySigner =
        private_key
            .trim()
            .parse()
            .map_err(|source: LocalSignerError| BlockchainError::InvalidPrivateKey {
                key_length: private_key.len(),
                source,
            })?;
    Ok(EthereumWallet::from(signer))
}

/// Connects the oracle wallet to every reachable endpoint and checks that the
/// node answers `eth_blockNumber`.
///
/// Unusable endpoints are skipped with a warning. Only one transport is
/// active at a time; the others are failover.
pub(crate) async fn initialize_provider(
    config: &BlockchainConfig,
) -> Result<BlockchainProvider, BlockchainError> {
    let wallet = oracle_wallet(config.private_key())?;
    let network = config.network();

    let mut transports = Vec::with_capacity(config.rpc_endpoints().len());
    for raw in config.rpc_endpoints() {
        let Some(endpoint) = parse_endpoint(raw) else {
            tracing::warn!(%network, endpoint = %raw, "Skipping RPC endpoint with unsupported URL");
            continue;
        };
        match open_transport(endpoint).await {
            Ok(transport) => transports.push(transport),
            Err(error) => tracing::warn!(
                %network,
                endpoint = %raw,
                %error,
                "Skipping unreachable RPC endpoint"
            ),
        }
    }

    if transports.is_empty() {
        return Err(BlockchainError::RpcConnectionFailed {
            attempts: config.rpc_endpoints().len(),
        });
    }
    let usable = transports.len();

    let transport = ServiceBuilder::new()
        .layer(FallbackLayer::default().with_active_transport_count(NonZeroUsize::MIN))
        .service(transports);
    let client = RpcClient::builder().transport(transport, false);
    let provider = ProviderBuilder::new().wallet(wallet).connect_client(client);

    let block = provider.get_block_number().await.map_err(|error| {
        tracing::error!(%network, %error, "No RPC endpoint answered eth_blockNumber");
        BlockchainError::RpcConnectionFailed { attempts: usable }
    })?;

    tracing::info!(%network, endpoints = usable, block, "Ledger provider connected");
    Ok(Arc::new(provider.erased()))
}

//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gas_gate_blocks_total` (counter): block notifications forwarded
//! - `gas_gate_gas_price_gwei` (gauge): last observed gas price
//! - `gas_gate_rpc_failures_total` (counter): failed RPC calls by method
//! - `gas_gate_deploys_total` (counter): deploy runs by network, result
//!
//! Recording is a no-op until `init_metrics` installs the exporter.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::blockchain::GasPrice;
use crate::deploy::NetworkMode;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

pub fn record_block() {
    metrics::counter!("gas_gate_blocks_total").increment(1);
}

pub fn record_gas_price(price: GasPrice) {
    metrics::gauge!("gas_gate_gas_price_gwei").set(price.gwei_f64());
}

pub fn record_rpc_failure(method: &'static str) {
    metrics::counter!("gas_gate_rpc_failures_total", "method" => method).increment(1);
}

pub fn record_deploy(network: NetworkMode, success: bool) {
    let result = if success { "success" } else { "failure" };
    metrics::counter!(
        "gas_gate_deploys_total",
        "network" => network.as_str(),
        "result" => result
    )
    .increment(1);
}

//! Tool argument list assembly

use lwcp_core::PreviewRequest;
use lwcp_launcher::preview_route;

use crate::config::{CliContract, ContractKind};

/// Argument list for a mobile preview:
///
/// `[action, -p, platform, -t, target, <id flag>, <id value>, --loglevel, level]`
pub fn build_arguments(
    request: &PreviewRequest,
    contract: &CliContract,
    log_level: &str,
) -> Vec<String> {
    let identifier = match contract.kind {
        ContractKind::Url => preview_route(request.component()),
        ContractKind::Component => request.component().to_string(),
    };

    vec![
        contract.primary_action.clone(),
        "-p".to_string(),
        request.platform().platform_name.clone(),
        "-t".to_string(),
        request.resolved_target().to_string(),
        contract.identifier_flag.clone(),
        identifier,
        "--loglevel".to_string(),
        log_level.to_string(),
    ]
}

//! Finding branch protection rules by repository and pattern.
//!
//! Only the legacy state migration needs this: newer state stores the rule's
//! node id directly.

use github_client::branch_protection::{
    RepositoryData, RulesPageData, REPOSITORY_ID_QUERY, RULES_PAGE_QUERY,
};
use github_client::graphql::query_as;
use github_client::{GraphQlClient, RuleSummary, Variable, Variables};
use tracing::{debug, info, instrument, warn};

use crate::errors::{ProtectionError, ProtectionResult};

#[cfg(test)]
#[path = "locator_tests.rs"]
mod tests;

/// Number of rules requested per page.
pub const PAGE_SIZE: i32 = 100;

/// Looks up the node id of the rule whose pattern is exactly `pattern`.
///
/// Pages are fetched one after the other until GitHub reports no further
/// page; the accumulated list is then scanned for the pattern.
///
/// # Returns
///
/// `Ok(None)` when no rule matches.
///
/// # Errors
///
/// - `ProtectionError::RepositoryNotFound` if the repository is not visible
/// - `ProtectionError::AmbiguousPattern` if several rules share the pattern
/// - `ProtectionError::GitHub` for transport and GraphQL failures, and with
///   `Error::InvalidResponse` when a page promises more rules without a cursor
#[instrument(skip(client))]
pub async fn find_rule_id(
    client: &dyn GraphQlClient,
    owner: &str,
    repository: &str,
    pattern: &str,
) -> ProtectionResult<Option<String>> {
    let rules = list_rules(client, owner, repository).await?;

    let mut matches = rules.into_iter().filter(|rule| rule.pattern == pattern);
    let found = matches.next();
    let extra = matches.count();

    if extra > 0 {
        warn!(count = extra + 1, "Pattern matches more than one rule");
        return Err(ProtectionError::AmbiguousPattern {
            repository: format!("{}/{}", owner, repository),
            pattern: pattern.to_string(),
            count: extra + 1,
        });
    }

    match &found {
        Some(rule) => info!(rule_id = rule.id.as_str(), "Found branch protection rule"),
        None => info!("No branch protection rule matches the pattern"),
    }

    Ok(found.map(|rule| rule.id))
}

/// Fetches every `(id, pattern)` pair of a repository's rules.
async fn list_rules(
    client: &dyn GraphQlClient,
    owner: &str,
    repository: &str,
) -> ProtectionResult<Vec<RuleSummary>> {
    let mut rules = Vec::new();
    let mut cursor: Option<String> = None;
    let mut page = 0usize;

    loop {
        page += 1;
        let mut variables = repository_variables(owner, repository);
        variables.insert("first".to_string(), Variable::Int(PAGE_SIZE));
        variables.insert("cursor".to_string(), Variable::Cursor(cursor.take()));

        let data: RulesPageData = query_as(client, RULES_PAGE_QUERY, &variables)
            .await
            .map_err(|e| repository_error(e, owner, repository))?;
        let connection = data
            .repository
            .ok_or_else(|| repository_not_found(owner, repository))?
            .branch_protection_rules;

        debug!(page, count = connection.nodes.len(), "Fetched page of branch protection rules");
        rules.extend(connection.nodes);

        match connection.page_info {
            Some(info) if info.has_next_page => match info.end_cursor {
                Some(next) => cursor = Some(next),
                None => {
                    warn!(page, "GitHub reported another page without a cursor");
                    return Err(github_client::Error::InvalidResponse.into());
                }
            },
            _ => break,
        }
    }

    Ok(rules)
}

/// Resolves the node id of `owner/repository`.
///
/// # Errors
///
/// `ProtectionError::RepositoryNotFound` if GitHub answers with no repository.
#[instrument(skip(client))]
pub async fn repository_id(
    client: &dyn GraphQlClient,
    owner: &str,
    repository: &str,
) -> ProtectionResult<String> {
    let variables = repository_variables(owner, repository);

    let data: RepositoryData = query_as(client, REPOSITORY_ID_QUERY, &variables)
        .await
        .map_err(|e| repository_error(e, owner, repository))?;

    data.repository
        .map(|repo| repo.id)
        .ok_or_else(|| repository_not_found(owner, repository))
}

fn repository_variables(owner: &str, repository: &str) -> Variables {
    let mut variables = Variables::new();
    variables.insert("owner".to_string(), Variable::string(owner));
    variables.insert("name".to_string(), Variable::string(repository));
    variables
}

fn repository_error(e: github_client::Error, owner: &str, repository: &str) -> ProtectionError {
    if e.is_not_found() {
        repository_not_found(owner, repository)
    } else {
        ProtectionError::GitHub(e)
    }
}

fn repository_not_found(owner: &str, repository: &str) -> ProtectionError {
    ProtectionError::RepositoryNotFound {
        owner: owner.to_string(),
        repository: repository.to_string(),
    }
}

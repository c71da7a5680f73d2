// mailsift - core/classify.rs
//
// Domain-based classification of extracted email addresses.
// Core layer: pure logic over constant tables, no I/O.
//
// Precedence per address: exact personal-domain match, then educational
// substring markers, then corporate as the default bucket. The `others`
// group is never assigned by these rules.

use crate::core::model::{Category, EmailAddress, EmailGroups};
use crate::util::constants;

/// The portion of an address used as its grouping key.
///
/// Everything after the *last* `@`, lowercased. The extractor's pattern
/// cannot produce a local part containing `@`, but the public API accepts
/// arbitrary strings, so degenerate inputs still need a defined answer:
/// a trailing `@` yields the empty string, and an address with no `@` at
/// all yields the whole (lowercased) string.
pub fn domain_of(address: &str) -> String {
    match address.rsplit_once('@') {
        Some((_, domain)) => domain.to_ascii_lowercase(),
        None => address.to_ascii_lowercase(),
    }
}

/// Pick the category for a lowercased domain.
fn categorise(domain: &str) -> Category {
    if constants::PERSONAL_DOMAINS.contains(&domain) {
        Category::Personal
    } else if constants::EDUCATIONAL_MARKERS
        .iter()
        .any(|marker| domain.contains(marker))
    {
        Category::Educational
    } else {
        // Default bucket for any custom/unrecognised domain.
        Category::Corporate
    }
}

/// Partition `addresses` into the four-category result.
///
/// Applied independently to each address in input order; the stored
/// address text keeps its original casing while the bucket key is the
/// lowercased domain. Total over all string inputs -- never fails, never
/// drops an address.
pub fn classify(addresses: &[EmailAddress]) -> EmailGroups {
    let mut groups = EmailGroups::default();

    for address in addresses {
        let domain = domain_of(address);
        let category = categorise(&domain);
        groups.insert(category, &domain, address.clone());
    }

    tracing::debug!(
        input = addresses.len(),
        personal = groups.count(Category::Personal),
        corporate = groups.count(Category::Corporate),
        educational = groups.count(Category::Educational),
        "Classification complete"
    );

    groups
}

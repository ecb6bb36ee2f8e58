use std::collections::HashSet;

/// True iff `approvers` contains at least 3 distinct, non-empty names.
/// Gates sensitive administrative operations (key rotation, mass
/// revocation) behind a `QUORUM_INSUFFICIENT` error when false.
pub fn quorum_3_of_5(approvers: &[String]) -> bool {
    let distinct: HashSet<&str> = approvers
        .iter()
        .map(String::as_str)
        .filter(|name| !name.is_empty())
        .collect();
    distinct.len() >= 3
}

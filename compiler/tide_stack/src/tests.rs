use super::*;

/// Depth of a right-leaning chain like `a + (b + (c + ...))`.
fn chain_depth(n: u32) -> u32 {
    ensure_sufficient_stack(|| if n == 0 { 0 } else { 1 + chain_depth(n - 1) })
}

#[test]
fn test_deep_chain_completes() {
    assert_eq!(chain_depth(200_000), 200_000);
}

#[test]
fn test_passes_the_result_through() {
    let found: Option<&str> = ensure_sufficient_stack(|| Some("Box<i32>"));
    assert_eq!(found, Some("Box<i32>"));
}

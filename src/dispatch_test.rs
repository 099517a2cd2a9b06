use super::*;

#[derive(Default)]
struct Log {
    seen: Vec<&'static str>,
}

fn pass_a(log: &mut Log, _: &u8, _: &mut Vec<u8>) -> Result<Claim, EditorError> {
    log.seen.push("a");
    Ok(Claim::Pass)
}

fn claim_b(log: &mut Log, ev: &u8, out: &mut Vec<u8>) -> Result<Claim, EditorError> {
    log.seen.push("b");
    out.push(*ev);
    Ok(Claim::Claimed)
}

fn claim_c(log: &mut Log, _: &u8, _: &mut Vec<u8>) -> Result<Claim, EditorError> {
    log.seen.push("c");
    Ok(Claim::Claimed)
}

fn fail_d(log: &mut Log, _: &u8, _: &mut Vec<u8>) -> Result<Claim, EditorError> {
    log.seen.push("d");
    Err(EditorError::ViewportUnavailable)
}

#[test]
fn first_claim_wins_and_stops_chain() {
    let mut log = Log::default();
    let mut out = Vec::new();
    let routes: [Route<Log, u8, u8>; 3] = [("a", pass_a), ("b", claim_b), ("c", claim_c)];
    let result = try_handlers(&mut log, &7, &mut out, &routes);
    assert_eq!(result, Dispatch::Claimed("b"));
    assert_eq!(result.claimed_by(), Some("b"));
    assert_eq!(log.seen, vec!["a", "b"]);
    assert_eq!(out, vec![7]);
}

#[test]
fn order_decides_the_winner() {
    let mut log = Log::default();
    let mut out = Vec::new();
    let routes: [Route<Log, u8, u8>; 2] = [("c", claim_c), ("b", claim_b)];
    assert_eq!(try_handlers(&mut log, &1, &mut out, &routes), Dispatch::Claimed("c"));
    assert!(out.is_empty());
}

#[test]
fn all_pass_is_unclaimed() {
    let mut log = Log::default();
    let mut out = Vec::new();
    let routes: [Route<Log, u8, u8>; 2] = [("a", pass_a), ("a2", pass_a)];
    let result = try_handlers(&mut log, &1, &mut out, &routes);
    assert_eq!(result, Dispatch::Unclaimed);
    assert_eq!(result.claimed_by(), None);
    assert_eq!(log.seen.len(), 2);
}

#[test]
fn error_stops_chain() {
    let mut log = Log::default();
    let mut out = Vec::new();
    let routes: [Route<Log, u8, u8>; 3] = [("a", pass_a), ("d", fail_d), ("b", claim_b)];
    let result = try_handlers(&mut log, &1, &mut out, &routes);
    assert_eq!(result, Dispatch::Failed { by: "d", error: EditorError::ViewportUnavailable });
    assert_eq!(log.seen, vec!["a", "d"]);
}

#[test]
fn empty_chain_is_unclaimed() {
    let mut log = Log::default();
    let mut out: Vec<u8> = Vec::new();
    let routes: [Route<Log, u8, u8>; 0] = [];
    assert_eq!(try_handlers(&mut log, &1, &mut out, &routes), Dispatch::Unclaimed);
}

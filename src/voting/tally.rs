use super::vote::{Vote, VoteResult, Voter};
use crate::host::SyncedMap;

/// Groups the shared vote map into ordered result groups.
///
/// Keys whose lookup misses are skipped: another client may have deleted
/// the vote between our `keys()` and `get()`. Output ordering is
/// user-visible and exact: numeric values ascending, all numbers before
/// all joker tokens, tokens in string order.
pub fn tally(votes: &dyn SyncedMap<Vote>) -> Vec<VoteResult> {
    let mut results: Vec<VoteResult> = Vec::new();
    for key in votes.keys() {
        let Some(vote) = votes.get(&key) else {
            continue; // stale key
        };
        let voter = Voter {
            name: vote.user_name.clone(),
            user_id: vote.user_id.clone(),
        };
        match results.iter_mut().find(|r| r.value == vote.value) {
            Some(result) => {
                result.voters.push(voter);
                result.count += 1;
            }
            None => results.push(VoteResult {
                value: vote.value,
                voters: vec![voter],
                count: 1,
            }),
        }
    }
    results.sort_by(|a, b| a.value.cmp_display(&b.value));
    results
}

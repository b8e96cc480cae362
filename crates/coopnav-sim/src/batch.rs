//! Independent episode batches.

use coopnav_core::{EpisodeId, SimRng};

use crate::error::SimResult;
use crate::record::EpisodeSummary;

/// Run `n_episodes` independent episodes, each with its own child RNG
/// stream derived from `master_seed`.
///
/// The per-episode seeds are derived up front in episode order, so results
/// are identical whether the batch runs serially or (with the `parallel`
/// feature) on a rayon pool.  `run_one` builds and drives one episode; it
/// gets the episode id and an owned RNG.
pub fn run_batch<F>(n_episodes: u32, master_seed: u64, run_one: F) -> SimResult<Vec<EpisodeSummary>>
where
    F: Fn(EpisodeId, SimRng) -> SimResult<EpisodeSummary> + Sync,
{
    let mut master = SimRng::new(master_seed);
    let streams: Vec<(EpisodeId, SimRng)> = (1..=n_episodes)
        .map(|i| (EpisodeId(i), master.child(u64::from(i))))
        .collect();

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        let mut summaries: Vec<EpisodeSummary> = streams
            .into_par_iter()
            .map(|(id, rng)| run_one(id, rng))
            .collect::<SimResult<_>>()?;
        summaries.sort_by_key(|s| s.episode);
        Ok(summaries)
    }

    #[cfg(not(feature = "parallel"))]
    {
        streams
            .into_iter()
            .map(|(id, rng)| run_one(id, rng))
            .collect()
    }
}

use crate::error::Result;
use crate::observation::Observation;

/// Number of observations returned by [`top_regions`] when no count is given.
pub const DEFAULT_TOP: usize = 3;

/// Returns the `n` observations with the highest deaths / total cases ratio.
///
/// Each observation is ranked on its own, so a region present on several
/// dates can appear more than once. Equal ratios keep their input order.
///
/// # Errors
///
/// Fails on the first observation whose deaths or total cases are not a
/// number, or whose total cases is zero.
pub fn top_regions(observations: &[Observation], n: usize) -> Result<Vec<&Observation>> {
    let mut ranked = observations
        .iter()
        .map(|o| -> Result<_> { Ok((o.death_ratio()?, o)) })
        .collect::<Result<Vec<_>>>()?;

    ranked.sort_by(|(a, _), (b, _)| b.total_cmp(a));

    Ok(ranked.into_iter().take(n).map(|(_, o)| o).collect())
}

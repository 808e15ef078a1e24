//! Runtime-specific modules split by target platform.

#[cfg(not(target_arch = "wasm32"))]
pub mod native;

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Ratio of a download that has completed. Without a known length the ratio
/// creeps towards 1 so the gauge still moves.
pub fn progress_ratio(downloaded: u64, total: Option<u64>) -> f64 {
    if let Some(t) = total
        && t > 0
    {
        return (downloaded as f64 / t as f64).min(1.0);
    }

    let d = downloaded as f64;
    d / (d + 1_000_000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_ratio() {
        assert_eq!(progress_ratio(50, Some(100)), 0.5);
        assert_eq!(progress_ratio(150, Some(100)), 1.0);
        assert_eq!(progress_ratio(0, None), 0.0);
        let unknown = progress_ratio(1_000_000, None);
        assert!(unknown > 0.0 && unknown < 1.0);
    }
}

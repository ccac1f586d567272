use crate::readings::WaterLevel;

const TREND_WINDOW: usize = 5;

fn mean(values: impl ExactSizeIterator<Item = f64>) -> Option<f64> {
    let count = values.len();
    if count == 0 {
        return None;
    }
    Some(values.sum::<f64>() / count as f64)
}

pub fn average_volume_m3(readings: &[WaterLevel]) -> f64 {
    mean(readings.iter().map(|level| level.volume_m3)).unwrap_or_default()
}

/// Percent change of the mean volume of the 5 newest readings against the 5 before them.
///
/// Returns 0 when there is no older window to compare with, or when its mean is 0.
pub fn trend_percent(readings: &[WaterLevel]) -> f64 {
    if readings.len() < 2 {
        return 0.0;
    }
    let recent = &readings[..readings.len().min(TREND_WINDOW)];
    let older = readings
        .get(TREND_WINDOW..readings.len().min(TREND_WINDOW * 2))
        .unwrap_or_default();

    let (Some(recent_avg), Some(older_avg)) = (
        mean(recent.iter().map(|level| level.volume_m3)),
        mean(older.iter().map(|level| level.volume_m3)),
    ) else {
        return 0.0;
    };
    if older_avg == 0.0 {
        return 0.0;
    }

    ((recent_avg - older_avg) / older_avg) * 100.0
}

pub fn fill_percent(current_volume_m3: f64, max_capacity_m3: f64) -> f64 {
    if max_capacity_m3 <= 0.0 {
        return 0.0;
    }
    current_volume_m3 / max_capacity_m3 * 100.0
}

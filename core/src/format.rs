use crate::dashboard::Dashboard;
use chrono::{DateTime, Utc};
use chrono_tz::Europe::Paris;

const UNAVAILABLE: &str = "---";

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Paris)
        .format("%d/%m/%Y %H:%M:%S")
        .to_string()
}

pub fn format_dashboard_message(dashboard: &Dashboard) -> String {
    let mut lines = Vec::with_capacity(10);

    match dashboard.latest_water.as_ref() {
        Some(level) => {
            lines.push(format!(
                "Volume actuel: {:.3} m³ ({:.0} L)",
                level.volume_m3, level.volume_liters
            ));
        }
        None => lines.push(format!("Volume actuel: {UNAVAILABLE}")),
    }
    lines.push(format!(
        "Remplissage: {:.1}% de {:.1} m³",
        dashboard.tank.percent, dashboard.tank.max_capacity_m3
    ));

    let (rain, rain_detail) = if dashboard.status.is_raining {
        ("IL PLEUT", "Augmentation > 10L détectée")
    } else {
        ("Pas de pluie", "Niveau stable")
    };
    lines.push(format!("État de la pluie: {rain} ({rain_detail})"));

    let (pump, pump_detail) = if dashboard.status.is_pump_active {
        ("EN MARCHE", "3 diminutions successives")
    } else {
        ("Arrêtée", "Pas d'activité")
    };
    lines.push(format!("État de la pompe: {pump} ({pump_detail})"));

    match dashboard.latest_atmospheric.as_ref() {
        Some(condition) => {
            lines.push(format!("Température: {:.1}°C", condition.temperature));
            lines.push(format!("Humidité: {:.1}%", condition.humidity));
        }
        None => {
            lines.push(format!("Température: {UNAVAILABLE}"));
            lines.push(format!("Humidité: {UNAVAILABLE}"));
        }
    }

    // Adding 0.0 turns -0.0 into 0.0.
    let trend = dashboard.statistics.trend_percent + 0.0;
    let sign = if trend >= 0.0 { "+" } else { "" };
    lines.push(format!(
        "Volume moyen: {:.3} m³",
        dashboard.statistics.average_volume_m3
    ));
    lines.push(format!("Tendance: {sign}{trend:.1}%"));

    let last_reading = dashboard
        .latest_water
        .as_ref()
        .map(|level| format_timestamp(&level.timestamp))
        .unwrap_or_else(|| UNAVAILABLE.to_string());
    lines.push(format!("Dernière lecture: {last_reading}"));

    lines.join("\n")
}

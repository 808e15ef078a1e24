//! Player statistics report built from a `/v2/stats/br/v2` payload.

use crate::model::{ModeStats, StatsData};

#[derive(Debug, Clone, PartialEq)]
pub struct StatRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsCard {
    pub title: &'static str,
    pub rows: Vec<StatRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsReport {
    pub player: String,
    pub battle_pass_level: u32,
    pub battle_pass_progress: u32,
    pub cards: Vec<StatsCard>,
}

impl StatsReport {
    /// `None` when the account has no aggregate stats (private or never
    /// played). Modes without data are skipped.
    pub fn from_data(data: StatsData) -> Option<Self> {
        let modes = data.stats.all?;

        let cards = [
            ("GENERAL (LIFETIME)", modes.overall),
            ("SOLO", modes.solo),
            ("DUO", modes.duo),
            ("SQUAD", modes.squad),
        ]
        .into_iter()
        .filter_map(|(title, stats)| stats.map(|s| mode_card(title, &s)))
        .collect();

        Some(Self {
            player: data.account.name,
            battle_pass_level: data.battle_pass.level,
            battle_pass_progress: data.battle_pass.progress,
            cards,
        })
    }

    pub fn battle_pass_line(&self) -> String {
        format!(
            "Battle Pass Level: {} (Progress: {}%)",
            self.battle_pass_level, self.battle_pass_progress
        )
    }
}

fn mode_card(title: &'static str, stats: &ModeStats) -> StatsCard {
    let placements = [stats.top10, stats.top12, stats.top3]
        .into_iter()
        .find(|n| *n > 0)
        .unwrap_or(0);

    let row = |label, value: String| StatRow { label, value };
    StatsCard {
        title,
        rows: vec![
            row("Wins", stats.wins.to_string()),
            row("Win Rate", format!("{:.2}%", stats.win_rate)),
            row("Kills", stats.kills.to_string()),
            row("K/D", format!("{:.2}", stats.kd)),
            row("Matches", stats.matches.to_string()),
            row("Top 10/12/3", placements.to_string()),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: serde_json::Value) -> StatsData {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_report_rows() {
        let report = StatsReport::from_data(data(json!({
            "account": {"name": "Jonesy"},
            "battlePass": {"level": 87, "progress": 42},
            "stats": {"all": {
                "overall": {"wins": 12, "winRate": 3.456, "kills": 900, "kd": 1.5,
                            "matches": 347, "top10": 0, "top12": 0, "top3": 5},
                "solo": {"wins": 1, "top10": 9}
            }}
        })))
        .unwrap();

        assert_eq!(report.player, "Jonesy");
        assert_eq!(report.battle_pass_line(), "Battle Pass Level: 87 (Progress: 42%)");
        assert_eq!(report.cards.len(), 2);

        let overall = &report.cards[0];
        assert_eq!(overall.title, "GENERAL (LIFETIME)");
        let values: Vec<&str> = overall.rows.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["12", "3.46%", "900", "1.50", "347", "5"]);

        assert_eq!(report.cards[1].title, "SOLO");
        assert_eq!(report.cards[1].rows[5].value, "9");
    }

    #[test]
    fn test_missing_aggregate_is_none() {
        let report = StatsReport::from_data(data(json!({
            "account": {"name": "Private"},
            "stats": {}
        })));
        assert!(report.is_none());
    }
}

//! Read-only placeholder resolution for text templating.
//!
//! Template engines interpolate `%gilder_<key>%` tokens into chat lines and
//! scoreboards; this adapter maps the key to a formatted string. Resolution
//! reads the cached snapshot only -- it never triggers a storage round trip,
//! because templating runs on latency-sensitive paths. Players are cached
//! from their first session interaction (see
//! [`SessionHooks`](crate::session::SessionHooks)), so an uncached identity
//! here means "never seen", which renders as an empty value.
//!
//! # Keys
//!
//! | Key | Value |
//! |-----|-------|
//! | `balance` / `balance_raw` / `balance_short` | `$1,234.56` / `1234.56` / `$1.23K` |
//! | `tokens` / `tokens_raw` / `tokens_short` | `1,234` / `1234` / `1.23K` |
//! | `shards` / `shards_raw` / `shards_short` | likewise |
//! | `credits` / `credits_raw` / `credits_short` | likewise |
//! | `level` | current level |
//! | `experience` (`xp`) / `experience_short` (`xp_short`) | `250.00` / `1.50K` |
//! | `rebirths` (`rebirth`) | completed rebirth count |
//! | `rebirth_required` (`rebirth_req`) | level needed for the next rebirth |
//! | `rebirth_remaining` (`rebirth_left`) | levels still to earn |
//! | `rebirth_can` (`can_rebirth`) | `Yes` / `No` |

use gilder_ledger::Economy;
use gilder_ledger::progression::{levels_until, required_level};
use gilder_types::format::{
    format_abbreviated, format_abbreviated_int, format_grouped_decimal, format_grouped_int,
};
use gilder_types::{PlayerId, PlayerLedgerRecord};

/// Placeholder resolver over the economy's cached snapshots.
#[derive(Clone)]
pub struct Placeholders {
    economy: Economy,
}

impl Placeholders {
    /// Create a resolver over the economy.
    pub fn new(economy: Economy) -> Self {
        Self { economy }
    }

    /// Resolve one placeholder key for a player.
    ///
    /// Returns `None` for an unknown key (so the template engine leaves the
    /// token untouched) and an empty string for an identity that has never
    /// been populated.
    pub async fn resolve(&self, id: PlayerId, key: &str) -> Option<String> {
        let record = self.economy.store().snapshot(id).await;
        let key = key.to_lowercase();

        match record {
            Some(record) => render(&record, &key),
            // Unknown keys still report None so templates can tell a bad
            // key from a never-seen player.
            None => render(&PlayerLedgerRecord::zeroed(), &key).map(|_| String::new()),
        }
    }
}

/// Render one key from a snapshot.
fn render(record: &PlayerLedgerRecord, key: &str) -> Option<String> {
    let value = match key {
        "balance" => format!("${}", format_grouped_decimal(record.balance)),
        "balance_raw" => record.balance.to_string(),
        "balance_short" => format!("${}", format_abbreviated(record.balance)),

        "tokens" => format_grouped_int(record.tokens),
        "tokens_raw" => record.tokens.to_string(),
        "tokens_short" => format_abbreviated_int(record.tokens),

        "shards" => format_grouped_int(record.shards),
        "shards_raw" => record.shards.to_string(),
        "shards_short" => format_abbreviated_int(record.shards),

        "credits" => format_grouped_int(record.credits),
        "credits_raw" => record.credits.to_string(),
        "credits_short" => format_abbreviated_int(record.credits),

        "level" => record.level.to_string(),
        "experience" | "xp" => format!("{:.2}", record.experience),
        "experience_short" | "xp_short" => format_abbreviated(record.experience),

        "rebirths" | "rebirth" => record.rebirths.to_string(),
        "rebirth_required" | "rebirth_req" => required_level(record.rebirths).to_string(),
        "rebirth_remaining" | "rebirth_left" => {
            levels_until(record.level, required_level(record.rebirths)).to_string()
        }
        "rebirth_can" | "can_rebirth" => {
            if record.level >= required_level(record.rebirths) {
                String::from("Yes")
            } else {
                String::from("No")
            }
        }

        _ => return None,
    };

    Some(value)
}

//! CSV export of the transaction feed.
//!
//! Fixed column layout: `ID,Date,User,Type,Category,Description,Amount,To`.
//! The four text columns are always double-quoted with internal quotes
//! doubled; Amount is an unquoted decimal. The per-column quoting is part
//! of the published format, which is why rows are formatted here instead of
//! through a uniform-quote-style CSV writer.

use std::collections::HashMap;

use crate::reports::DateRange;
use crate::ResultLedger;

use super::Ledger;

impl Ledger {
    /// Renders every transaction in the inclusive date range, newest first,
    /// with user ids resolved to display names where known.
    pub async fn export_csv(&self, range: &DateRange) -> ResultLedger<String> {
        let users = self.users().await?;
        let names: HashMap<&str, &str> = users
            .iter()
            .map(|user| (user.id.as_str(), user.name.as_str()))
            .collect();
        let display_name = |id: &str| names.get(id).copied().unwrap_or(id).to_string();

        let mut lines = vec!["ID,Date,User,Type,Category,Description,Amount,To".to_string()];
        for tx in self.all_transactions().await? {
            if !range.contains(tx.date) {
                continue;
            }
            let to = tx.to.as_deref().map(display_name).unwrap_or_default();
            lines.push(format!(
                "{},{},{},{},{},{},{},{}",
                tx.id,
                tx.date.format("%Y-%m-%d"),
                quoted(&display_name(&tx.user)),
                tx.kind.as_str(),
                quoted(&tx.category),
                quoted(&tx.description),
                tx.amount.to_decimal_string(),
                quoted(&to),
            ));
        }
        Ok(lines.join("\n"))
    }
}

fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_doubles_internal_quotes() {
        assert_eq!(quoted("milk"), "\"milk\"");
        assert_eq!(quoted(""), "\"\"");
        assert_eq!(quoted("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}

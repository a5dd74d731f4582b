//! Report queries: thin loaders over the pure aggregation in
//! [`crate::reports`].

use crate::reports::{
    expense_by_category, monthly_trend, totals_by_user, CategoryTotal, DateRange, MonthlyPoint,
    UserTotals,
};
use crate::store::Query;
use crate::{ResultLedger, Transaction};

use super::{Ledger, TRANSACTIONS};

impl Ledger {
    /// The full transaction set, newest first.
    pub(crate) async fn all_transactions(&self) -> ResultLedger<Vec<Transaction>> {
        let rows = self
            .store()
            .find(TRANSACTIONS, Query::new().order_by_desc("date"))
            .await?;
        rows.into_iter()
            .map(|(id, doc)| Transaction::from_doc(&id, doc))
            .collect()
    }

    pub async fn report_expense_by_category(
        &self,
        range: &DateRange,
    ) -> ResultLedger<Vec<CategoryTotal>> {
        let transactions = self.all_transactions().await?;
        Ok(expense_by_category(&transactions, range))
    }

    pub async fn report_totals_by_user(&self, range: &DateRange) -> ResultLedger<Vec<UserTotals>> {
        let users = self.users().await?;
        let transactions = self.all_transactions().await?;
        Ok(totals_by_user(&users, &transactions, range))
    }

    /// Trailing `months` calendar months ending with the current one.
    pub async fn report_monthly_trend(&self, months: usize) -> ResultLedger<Vec<MonthlyPoint>> {
        let transactions = self.all_transactions().await?;
        let today = chrono::Utc::now().date_naive();
        Ok(monthly_trend(&transactions, months, today))
    }
}

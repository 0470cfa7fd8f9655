//! Tushare Pro provider module.
//!
//! Exposes the Chinese market, fundamentals, financial statement and
//! macroeconomic datasets of <https://tushare.pro> as data operations.
//! All operations share one wire client (see [`client`]) and the generic
//! dataset machinery; `bak_basic` is additionally restricted to trading days.

mod client;
pub mod datasets;

pub use client::{TushareAuthenticator, TushareSession};

use std::sync::Arc;

use crate::models::VendorId;
use crate::provider::dataset::{
    CalendarFilteredOperation, DatasetOperation, DatasetSpec, OperationContext,
};
use crate::provider::{DataOperation, ProviderModule};

use datasets::*;

/// Datasets served as-is, in registration order.
static PLAIN_DATASETS: &[&DatasetSpec] = &[
    &DAILY,
    &TRADE_CAL,
    &STOCK_BASIC,
    &STOCK_COMPANY,
    &INCOME,
    &BALANCESHEET,
    &CASHFLOW,
    &SHIBOR_LPR,
    &CN_GDP,
    &CN_CPI,
    &CN_PPI,
    &CN_M,
    &SF_MONTH,
    &CN_PMI,
];

pub struct TushareProvider {
    ctx: Arc<OperationContext>,
}

impl TushareProvider {
    pub fn new(ctx: Arc<OperationContext>) -> Self {
        Self { ctx }
    }
}

impl ProviderModule for TushareProvider {
    fn vendor(&self) -> VendorId {
        VendorId::Tushare
    }

    fn operations(&self) -> Vec<Arc<dyn DataOperation>> {
        let mut operations: Vec<Arc<dyn DataOperation>> = PLAIN_DATASETS
            .iter()
            .copied()
            .map(|spec| {
                Arc::new(DatasetOperation::new(spec, self.ctx.clone())) as Arc<dyn DataOperation>
            })
            .collect();
        operations.push(Arc::new(CalendarFilteredOperation::new(
            &BAK_BASIC,
            TRADE_DATE_FIELD,
            self.ctx.clone(),
        )));
        operations
    }
}

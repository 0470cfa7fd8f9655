//! Tushare dataset catalog.

use crate::provider::dataset::{DatasetSpec, ParamSpec};

/// Join columns of every financial statement.
pub const REPORT_DATE_FIELDS: &[&str] = &["ann_date", "f_ann_date", "end_date"];

/// Date column of daily datasets.
pub const TRADE_DATE_FIELD: &str = "trade_date";

const TS_CODE: ParamSpec = ParamSpec::text(
    "ts_code",
    "Instrument code such as 000001.SZ; several codes may be comma-separated.",
);
const START_DATE: ParamSpec = ParamSpec::date("start_date", "Start of the date range.");
const END_DATE: ParamSpec = ParamSpec::date("end_date", "End of the date range.");
const MONTH: ParamSpec = ParamSpec::text("m", "Month (YYYYMM); several months may be comma-separated.");
const START_MONTH: ParamSpec = ParamSpec::text("start_m", "First month (YYYYMM).");
const END_MONTH: ParamSpec = ParamSpec::text("end_m", "Last month (YYYYMM).");

// ============================================================================
// Market data
// ============================================================================

pub static DAILY: DatasetSpec = DatasetSpec {
    name: "daily",
    api_name: "daily",
    description: "A-share daily quotes (unadjusted): open, high, low, close, pre_close, change, pct_chg, vol, amount. Use trade_date for one day or start_date/end_date for a range.",
    params: &[
        TS_CODE,
        ParamSpec::date("trade_date", "Single trading day; not combined with start_date/end_date."),
        START_DATE,
        END_DATE,
    ],
    mandatory_fields: &[TRADE_DATE_FIELD],
    failure_context: "Failed to fetch daily quotes",
};

pub static TRADE_CAL: DatasetSpec = DatasetSpec {
    name: "trade_cal",
    api_name: "trade_cal",
    description: "Exchange trading calendar: exchange, cal_date, is_open, pretrade_date. Defaults to the Shanghai Stock Exchange.",
    params: &[
        ParamSpec::text("exchange", "Exchange code: SSE, SZSE, CFFEX, SHFE, CZCE, DCE, INE."),
        START_DATE,
        END_DATE,
        ParamSpec::text("is_open", "1 for trading days, 0 for closed days."),
    ],
    mandatory_fields: &[],
    failure_context: "Failed to fetch trading calendar",
};

// ============================================================================
// Fundamentals
// ============================================================================

pub static STOCK_BASIC: DatasetSpec = DatasetSpec {
    name: "stock_basic",
    api_name: "stock_basic",
    description: "Listed stock reference data: ts_code, symbol, name, area, industry, market, exchange, list_status, list_date, is_hs.",
    params: &[
        TS_CODE,
        ParamSpec::text("name", "Stock name."),
        ParamSpec::text("market", "Market segment: 主板, 创业板, 科创板, CDR, 北交所."),
        ParamSpec::text("list_status", "L listed, D delisted, P suspended; defaults to L."),
        ParamSpec::text("exchange", "Exchange code: SSE, SZSE, BSE."),
        ParamSpec::text("is_hs", "Stock Connect flag: N no, H Shanghai, S Shenzhen."),
    ],
    mandatory_fields: &[],
    failure_context: "Failed to fetch stock basics",
};

pub static STOCK_COMPANY: DatasetSpec = DatasetSpec {
    name: "stock_company",
    api_name: "stock_company",
    description: "Listed company profile: chairman, manager, secretary, reg_capital, setup_date, province, city, website, employees, main_business.",
    params: &[
        TS_CODE,
        ParamSpec::text("exchange", "Exchange code: SSE, SZSE, BSE."),
    ],
    mandatory_fields: &[],
    failure_context: "Failed to fetch listed company profiles",
};

pub static BAK_BASIC: DatasetSpec = DatasetSpec {
    name: "bak_basic",
    api_name: "bak_basic",
    description: "Daily fundamentals of one stock restricted to the trading days of a range (data from 2016): pe, float_share, total_share, total_assets, eps, bvps, pb, rev_yoy, profit_yoy, gpr, npr, holder_num.",
    params: &[
        TS_CODE.required(),
        START_DATE.required(),
        END_DATE.required(),
    ],
    mandatory_fields: &[TRADE_DATE_FIELD],
    failure_context: "Failed to fetch stock fundamentals",
};

// ============================================================================
// Financial statements
// ============================================================================

const ANN_DATE: ParamSpec = ParamSpec::date("ann_date", "Announcement date.");
const F_ANN_DATE: ParamSpec = ParamSpec::date("f_ann_date", "Effective announcement date.");
const REPORT_START: ParamSpec = ParamSpec::date("start_date", "Announcement range start.");
const REPORT_END: ParamSpec = ParamSpec::date("end_date", "Announcement range end.");
const PERIOD: ParamSpec = ParamSpec::text("period", "Reporting period end (e.g. 20231231 for the annual report).");
const REPORT_TYPE: ParamSpec = ParamSpec::text("report_type", "Report type code, 1 for consolidated.");
const COMP_TYPE: ParamSpec = ParamSpec::text("comp_type", "Company type: 1 general, 2 bank, 3 insurance, 4 securities.");

pub static INCOME: DatasetSpec = DatasetSpec {
    name: "income",
    api_name: "income",
    description: "Income statement: total_revenue, revenue, operate_profit, total_profit, n_income, n_income_attr_p, basic_eps and related items.",
    params: &[
        TS_CODE,
        ANN_DATE,
        F_ANN_DATE,
        REPORT_START,
        REPORT_END,
        PERIOD,
        REPORT_TYPE,
        COMP_TYPE,
    ],
    mandatory_fields: REPORT_DATE_FIELDS,
    failure_context: "Failed to fetch income statements",
};

pub static BALANCESHEET: DatasetSpec = DatasetSpec {
    name: "balancesheet",
    api_name: "balancesheet",
    description: "Balance sheet: total_assets, total_liab, total_hldr_eqy_exc_min_int, money_cap, accounts_receiv, inventories and related items.",
    params: &[
        TS_CODE,
        ANN_DATE,
        REPORT_START,
        REPORT_END,
        PERIOD,
        REPORT_TYPE,
        COMP_TYPE,
    ],
    mandatory_fields: REPORT_DATE_FIELDS,
    failure_context: "Failed to fetch balance sheets",
};

pub static CASHFLOW: DatasetSpec = DatasetSpec {
    name: "cashflow",
    api_name: "cashflow",
    description: "Cash flow statement: n_cashflow_act, n_cashflow_inv_act, n_cash_flows_fnc_act, free_cashflow and related items.",
    params: &[
        TS_CODE,
        ANN_DATE,
        F_ANN_DATE,
        REPORT_START,
        REPORT_END,
        PERIOD,
        REPORT_TYPE,
        COMP_TYPE,
        ParamSpec::integer("is_calc", "1 to include derived items, 0 otherwise."),
    ],
    mandatory_fields: REPORT_DATE_FIELDS,
    failure_context: "Failed to fetch cash flow statements",
};

// ============================================================================
// Macroeconomic data
// ============================================================================

pub static SHIBOR_LPR: DatasetSpec = DatasetSpec {
    name: "shibor_lpr",
    api_name: "shibor_lpr",
    description: "Loan Prime Rate: date, 1y, 5y.",
    params: &[START_DATE, END_DATE],
    mandatory_fields: &[],
    failure_context: "Failed to fetch loan prime rates",
};

pub static CN_GDP: DatasetSpec = DatasetSpec {
    name: "cn_gdp",
    api_name: "cn_gdp",
    description: "China GDP by quarter: quarter, gdp, gdp_yoy, pi, pi_yoy, si, si_yoy, ti, ti_yoy.",
    params: &[
        ParamSpec::text("q", "Quarter such as 2023Q1; several quarters may be comma-separated."),
        ParamSpec::text("start_q", "First quarter (e.g. 2022Q1)."),
        ParamSpec::text("end_q", "Last quarter (e.g. 2023Q4)."),
    ],
    mandatory_fields: &["quarter"],
    failure_context: "Failed to fetch GDP data",
};

pub static CN_CPI: DatasetSpec = DatasetSpec {
    name: "cn_cpi",
    api_name: "cn_cpi",
    description: "China CPI by month: nt_val, nt_yoy, nt_mom, nt_accu and the town/cnt breakdowns.",
    params: &[MONTH, START_MONTH, END_MONTH],
    mandatory_fields: &["month"],
    failure_context: "Failed to fetch CPI data",
};

pub static CN_PPI: DatasetSpec = DatasetSpec {
    name: "cn_ppi",
    api_name: "cn_ppi",
    description: "China PPI by month: ppi_yoy, ppi_mp_yoy, ppi_cg_yoy, ppi_mom and sector breakdowns.",
    params: &[MONTH, START_MONTH, END_MONTH],
    mandatory_fields: &["month"],
    failure_context: "Failed to fetch PPI data",
};

pub static CN_M: DatasetSpec = DatasetSpec {
    name: "cn_m",
    api_name: "cn_m",
    description: "China money supply by month: m0, m0_yoy, m1, m1_yoy, m2, m2_yoy and month-on-month changes.",
    params: &[MONTH, START_MONTH, END_MONTH],
    mandatory_fields: &["month"],
    failure_context: "Failed to fetch money supply data",
};

pub static SF_MONTH: DatasetSpec = DatasetSpec {
    name: "sf_month",
    api_name: "sf_month",
    description: "Aggregate social financing by month: inc_month, inc_cumval, stk_endval.",
    params: &[MONTH, START_MONTH, END_MONTH],
    mandatory_fields: &["month"],
    failure_context: "Failed to fetch social financing data",
};

pub static CN_PMI: DatasetSpec = DatasetSpec {
    name: "cn_pmi",
    api_name: "cn_pmi",
    description: "China purchasing managers' index by month: manufacturing (pmi010000..), non-manufacturing (pmi020100..) and composite (pmi030000) series.",
    params: &[MONTH, START_MONTH, END_MONTH],
    mandatory_fields: &["month"],
    failure_context: "Failed to fetch PMI data",
};

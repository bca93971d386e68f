//! Built-in federal tables for the tax years this crate ships with.
//!
//! These match the SQLite seed files row for row.

use rust_decimal::Decimal;

use crate::models::{
    BracketDetails, FilingColumns, INCOME_CEILING, IncomeRange, StandardDeductionDetails,
};

const TOP: i64 = 2_147_483_647;

/// Bracket bounds in column order: single, joint, separate, head of household.
type Bounds = [(i64, i64); 4];

const BRACKETS_2024: [(i32, Bounds); 7] = [
    (10, [(0, 11600), (0, 23200), (0, 11600), (0, 16550)]),
    (12, [(11600, 47150), (23200, 94300), (11600, 47150), (16550, 63100)]),
    (22, [(47150, 100525), (94300, 201050), (47150, 100525), (63100, 100500)]),
    (24, [(100525, 191950), (201050, 383900), (100525, 191950), (100500, 191950)]),
    (32, [(191950, 243725), (383900, 487450), (191950, 243725), (191950, 243700)]),
    (35, [(243725, 609350), (487450, 731200), (243725, 365600), (243700, 609350)]),
    (37, [(609350, TOP), (731200, TOP), (365600, TOP), (609350, TOP)]),
];

const BRACKETS_2025: [(i32, Bounds); 7] = [
    (10, [(0, 11925), (0, 23850), (0, 11925), (0, 17000)]),
    (12, [(11925, 48475), (23850, 96950), (11925, 48475), (17000, 64850)]),
    (22, [(48475, 103350), (96950, 206700), (48475, 103350), (64850, 103350)]),
    (24, [(103350, 197300), (206700, 394600), (103350, 197300), (103350, 197300)]),
    (32, [(197300, 250525), (394600, 501050), (197300, 250525), (197300, 250500)]),
    (35, [(250525, 626350), (501050, 751600), (250525, 375800), (250500, 626350)]),
    (37, [(626350, TOP), (751600, TOP), (375800, TOP), (626350, TOP)]),
];

/// Standard deductions: year, then single, joint, separate, head of household.
const DEDUCTIONS: [(i32, [i64; 4]); 2] = [
    (2024, [14600, 29200, 14600, 21900]),
    (2025, [15750, 31500, 15750, 23625]),
];

fn bracket(tax_year: i32, tax_rate: i32, bounds: &Bounds) -> BracketDetails {
    let range = |(min, max): (i64, i64)| {
        let max = if max == TOP {
            INCOME_CEILING
        } else {
            Decimal::from(max)
        };
        IncomeRange::new(Decimal::from(min), max)
    };
    BracketDetails {
        tax_year,
        tax_rate,
        ranges: FilingColumns {
            single: range(bounds[0]),
            joint: range(bounds[1]),
            separate: range(bounds[2]),
            head_of_household: range(bounds[3]),
        },
    }
}

/// All built-in bracket rows, every year, in table order.
pub fn bracket_rows() -> Vec<BracketDetails> {
    let years = [(2024, &BRACKETS_2024), (2025, &BRACKETS_2025)];
    years
        .iter()
        .flat_map(|(year, rows)| {
            rows.iter()
                .map(move |(rate, bounds)| bracket(*year, *rate, bounds))
        })
        .collect()
}

/// All built-in standard deduction rows, one per year.
pub fn deduction_rows() -> Vec<StandardDeductionDetails> {
    DEDUCTIONS
        .iter()
        .map(|(tax_year, amounts)| StandardDeductionDetails {
            tax_year: *tax_year,
            amounts: FilingColumns {
                single: Decimal::from(amounts[0]),
                joint: Decimal::from(amounts[1]),
                separate: Decimal::from(amounts[2]),
                head_of_household: Decimal::from(amounts[3]),
            },
        })
        .collect()
}

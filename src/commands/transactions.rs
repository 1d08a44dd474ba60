// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::models::{
    BankAccount, BankAccountId, Category, CategoryId, NewTransaction, TransactionId,
};
use crate::store::transactions::TransactionFilter;
use crate::store::{accounts, categories, transactions};
use crate::utils::{
    arg, maybe_print_json, opt_arg, parse_datetime, parse_datetime_end, parse_money, pretty_table,
};
use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let id: TransactionId = arg(sub, "id")?.parse()?;
            let txn = transactions::get(conn, id)?;
            transactions::delete(conn, id)?;
            println!("Removed transaction '{}' ({})", txn, txn.amount);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let new = NewTransaction {
        bank_account_id: arg(sub, "account")?.parse()?,
        category_id: arg(sub, "category")?.parse()?,
        description: arg(sub, "description")?.to_string(),
        date: parse_datetime(arg(sub, "date")?)?,
        amount: parse_money(arg(sub, "amount")?)?,
    };
    let txn = transactions::create(conn, &new).context("Could not record transaction")?;
    let account = accounts::get(conn, txn.bank_account_id)?;
    println!(
        "Recorded {} {} on {} (acct: {}) id {}",
        txn.amount,
        account.currency,
        txn.date.format("%Y-%m-%d"),
        account.name,
        txn.id()
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.account.clone(),
                    r.category.clone(),
                    r.description.clone(),
                    r.amount.clone(),
                    r.currency.clone(),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Account", "Category", "Description", "Amount", "CCY", "Id"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub account: String,
    pub category: String,
    pub kind: String,
    pub description: String,
    pub amount: String,
    /// Amount with the direction implied by the category kind.
    pub signed_amount: String,
    pub currency: String,
}

pub fn filter_from_args(sub: &clap::ArgMatches) -> Result<TransactionFilter> {
    Ok(TransactionFilter {
        bank_account_id: opt_arg(sub, "account")
            .map(str::parse::<BankAccountId>)
            .transpose()?,
        category_id: opt_arg(sub, "category")
            .map(str::parse::<CategoryId>)
            .transpose()?,
        from: opt_arg(sub, "from").map(parse_datetime).transpose()?,
        to: opt_arg(sub, "to").map(parse_datetime_end).transpose()?,
        limit: sub.get_one::<usize>("limit").copied(),
    })
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let filter = filter_from_args(sub)?;
    let mut account_cache: HashMap<BankAccountId, BankAccount> = HashMap::new();
    let mut category_cache: HashMap<CategoryId, Category> = HashMap::new();

    let mut data = Vec::new();
    for txn in transactions::list(conn, &filter)? {
        let account = match account_cache.entry(txn.bank_account_id) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(accounts::get(conn, txn.bank_account_id)?),
        };
        let category = match category_cache.entry(txn.category_id) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(categories::get(conn, txn.category_id)?),
        };
        data.push(TransactionRow {
            id: txn.id().to_string(),
            date: txn.date.format("%Y-%m-%d").to_string(),
            account: account.name.clone(),
            category: category.name.clone(),
            kind: category.kind.to_string(),
            description: txn.description.clone(),
            amount: txn.amount.to_string(),
            signed_amount: format!("{:.2}", txn.signed_amount(category.kind)),
            currency: account.currency.to_string(),
        });
    }
    Ok(data)
}

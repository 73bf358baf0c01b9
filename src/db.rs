use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};

use crate::error::Result;
use crate::models::Loan;
use crate::store::LoanStore;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS loans (
    position INTEGER PRIMARY KEY,
    id TEXT NOT NULL,
    loan_type TEXT NOT NULL,
    lender TEXT NOT NULL,
    amount REAL,
    rate REAL,
    tenure INTEGER NOT NULL,
    start_date TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS paid_months (
    loan_position INTEGER NOT NULL,
    seq INTEGER NOT NULL,
    paid_at TEXT NOT NULL,
    PRIMARY KEY (loan_position, seq),
    FOREIGN KEY (loan_position) REFERENCES loans(position) ON DELETE CASCADE
);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Loans in a SQLite file. `position` carries the list order; a save rewrites
/// both tables in one transaction.
pub struct SqliteStore {
    conn: Connection,
    path: PathBuf,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = get_connection(path)?;
        init_db(&conn)?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }
}

impl LoanStore for SqliteStore {
    fn load(&self) -> Result<Vec<Loan>> {
        let mut stmt = self.conn.prepare(
            "SELECT position, id, loan_type, lender, amount, rate, tenure, start_date \
             FROM loans ORDER BY position",
        )?;
        let mut rows: Vec<(i64, Loan)> = stmt
            .query_map([], |row| {
                let amount: Option<f64> = row.get(4)?;
                let rate: Option<f64> = row.get(5)?;
                Ok((
                    row.get(0)?,
                    Loan {
                        id: row.get(1)?,
                        loan_type: row.get(2)?,
                        lender: row.get(3)?,
                        amount: amount.unwrap_or(0.0),
                        rate: rate.unwrap_or(0.0),
                        tenure: row.get(6)?,
                        start_date: row.get(7)?,
                        paid_months: Vec::new(),
                    },
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut paid = self
            .conn
            .prepare("SELECT paid_at FROM paid_months WHERE loan_position = ?1 ORDER BY seq")?;
        for (position, loan) in rows.iter_mut() {
            loan.paid_months = paid
                .query_map([*position], |row| row.get(0))?
                .collect::<std::result::Result<Vec<String>, _>>()?;
        }

        log::debug!("loaded {} loans from {}", rows.len(), self.path.display());
        Ok(rows.into_iter().map(|(_, loan)| loan).collect())
    }

    fn save(&self, loans: &[Loan]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM paid_months", [])?;
        tx.execute("DELETE FROM loans", [])?;
        {
            let mut insert_loan = tx.prepare(
                "INSERT INTO loans (position, id, loan_type, lender, amount, rate, tenure, start_date) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            let mut insert_paid = tx.prepare(
                "INSERT INTO paid_months (loan_position, seq, paid_at) VALUES (?1, ?2, ?3)",
            )?;
            for (position, loan) in loans.iter().enumerate() {
                let position = position as i64;
                insert_loan.execute(params![
                    position,
                    loan.id,
                    loan.loan_type,
                    loan.lender,
                    loan.amount,
                    loan.rate,
                    loan.tenure,
                    loan.start_date,
                ])?;
                for (seq, paid_at) in loan.paid_months.iter().enumerate() {
                    insert_paid.execute(params![position, seq as i64, paid_at])?;
                }
            }
        }
        tx.commit()?;
        log::debug!("saved {} loans to {}", loans.len(), self.path.display());
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

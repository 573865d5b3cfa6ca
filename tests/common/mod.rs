#![allow(dead_code)]

use std::io::Write;
use std::sync::Arc;

use chainrag::store::TransactionStore;
use tempfile::NamedTempFile;

pub const HEADER: &str = "index,block_timestamp,previous_hash,nonce,hash,sender,receiver,amount,transaction_timestamp,transaction_id";

/// Three blocks; block 1 holds two transfers from the same sender
pub const ROWS: &[&str] = &[
    "1,1700000000,0000000000,314,a1b2c3d4e5,abc12345xyz,rcv00001aa,10.00,1700000010,tx-001",
    "1,1700000000,0000000000,314,a1b2c3d4e5,abc12345xyz,rcv00002bb,20.00,1700000020,tx-002",
    "2,1700003600,a1b2c3d4e5,2718,f6e5d4c3b2,def67890uvw,rcv00001aa,5.50,1700003610,tx-003",
    "3,1700090000,f6e5d4c3b2,1618,0badc0ffee,ghi13579rst,rcv00003cc,1234.50,1700090010,tx-004",
];

pub fn write_csv(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

pub fn sample_store() -> Arc<TransactionStore> {
    let file = write_csv(ROWS);
    Arc::new(TransactionStore::from_csv_path(file.path()).unwrap())
}

pub fn empty_store() -> Arc<TransactionStore> {
    Arc::new(TransactionStore::default())
}

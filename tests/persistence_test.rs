#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::io::Write;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_rocksdb_persistence_recovery() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    // 1. First run: allow USD, hire an employee and grant a bonus
    let mut csv1 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv1, "op, time, account, employee, amount, asset, target").unwrap();
    writeln!(csv1, "allow, 100, , , , USD").unwrap();
    writeln!(csv1, "hire, 100, alice, , 10, , Dev").unwrap();
    writeln!(csv1, "bonus, 100, , 1, 250").unwrap();

    let mut cmd1 = Command::new(cargo_bin!("payroll-engine"));
    cmd1.arg(csv1.path()).arg("--db-path").arg(&db_path);

    let output1 = cmd1.output().expect("Failed to execute command");
    assert!(output1.status.success());
    let stdout1 = String::from_utf8_lossy(&output1.stdout);
    assert!(stdout1.contains("1,alice,Dev,10,0,0,250,0,100,,"));

    // 2. Second run on the same DB: the record, the id counter and the allowed
    // assets survive
    let mut csv2 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv2, "op, time, account, employee, amount, asset, target").unwrap();
    writeln!(csv2, "allocate, 200, alice, , , , USD:100").unwrap();
    writeln!(csv2, "bonus, 200, , 1, 50").unwrap();
    writeln!(csv2, "hire, 200, bob, , 20, , Dev").unwrap();

    let mut cmd2 = Command::new(cargo_bin!("payroll-engine"));
    cmd2.arg(csv2.path()).arg("--db-path").arg(&db_path);

    let output2 = cmd2.output().expect("Failed to execute command");
    assert!(output2.status.success());
    let stdout2 = String::from_utf8_lossy(&output2.stdout);

    assert!(stdout2.contains("1,alice,Dev,10,1000,0,300,0,100,,USD:100"));
    assert!(stdout2.contains("2,bob,Dev,20,0,0,0,0,200,,"));
}

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!());
    cmd.arg("tests/fixtures/payroll.csv");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "id,address,role,salary_per_second,owed_salary,accrued_salary,bonus,reimbursement,last_payroll_time,end_date,allocation",
        ))
        // alice was paid at 1000 and has accrued 100 seconds since
        .stdout(predicate::str::contains(
            "1,alice,Engineer,10,1000,0,0,0,1000,,ANT:20;USD:80",
        ))
        // bob was fully paid after termination and removed
        .stdout(predicate::str::contains("bob").not());

    Ok(())
}

#[test]
fn test_cli_writes_payments() -> Result<(), Box<dyn std::error::Error>> {
    let payments = tempfile::NamedTempFile::new()?;

    let mut cmd = Command::new(cargo_bin!());
    cmd.arg("tests/fixtures/payroll.csv")
        .arg("--payments")
        .arg(payments.path());
    cmd.assert().success();

    let written = std::fs::read_to_string(payments.path())?;
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(
        lines,
        vec![
            "time,to,asset,amount,reference",
            "1000,alice,ANT,4000,Payroll",
            "1000,alice,USD,8000,Payroll",
            "1100,bob,USD,20000,Payroll",
            "1100,bob,USD,500,Bonus",
        ]
    );

    Ok(())
}

#[test]
fn test_cli_reports_rejected_rows_and_continues() -> Result<(), Box<dyn std::error::Error>> {
    let csv_path = tempfile::NamedTempFile::new()?;
    let mut wtr = csv::Writer::from_path(csv_path.path())?;
    wtr.write_record(common::HEADER)?;
    wtr.write_record(["hire", "0", "alice", "", "10", "", "Dev"])?;
    // Unknown op
    wtr.write_record(["fire", "0", "alice", "", "", "", ""])?;
    // Duplicate address
    wtr.write_record(["hire", "0", "alice", "", "10", "", "Dev"])?;
    // Not a number
    wtr.write_record(["bonus", "0", "", "1", "lots", "", ""])?;
    wtr.write_record(["bonus", "0", "", "1", "25", "", ""])?;
    wtr.flush()?;
    drop(wtr);

    let mut cmd = Command::new(cargo_bin!());
    cmd.arg(csv_path.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error reading command"))
        .stderr(predicate::str::contains("Error processing command"))
        .stdout(predicate::str::contains("1,alice,Dev,10,0,0,25,0,0,,"));

    Ok(())
}

#[test]
fn test_cli_rejects_short_rate_expiry() {
    let mut cmd = Command::new(cargo_bin!());
    cmd.arg("tests/fixtures/payroll.csv")
        .arg("--rate-expiry")
        .arg("60");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Rate expiry time is too short"));
}

#[test]
fn test_cli_generated_payroll() -> Result<(), Box<dyn std::error::Error>> {
    let csv_path = tempfile::NamedTempFile::new()?;
    common::generate_payroll_csv(csv_path.path(), 25, 3_600)?;

    let output = Command::new(cargo_bin!()).arg(csv_path.path()).output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    // Header plus one row per employee, every one of them paid up to date
    assert_eq!(stdout.lines().count(), 26);
    for line in stdout.lines().skip(1) {
        assert!(line.ends_with(",1,0,0,0,0,3600,,USD:100"), "{line}");
    }

    Ok(())
}

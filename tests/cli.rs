use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn household(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("household").unwrap();
    cmd.env("HOUSEHOLD_LEDGER_DATA_DIR", dir.path());
    cmd.env_remove("HOUSEHOLD_LOG");
    cmd
}

fn run(dir: &TempDir, args: &[&str]) -> String {
    let output = household(dir).args(args).assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

fn invite_code(create_output: &str) -> String {
    create_output
        .lines()
        .find_map(|l| l.trim().strip_prefix("Invite code: "))
        .unwrap()
        .trim()
        .to_string()
}

#[test]
fn test_commands_need_an_active_user() {
    let dir = TempDir::new().unwrap();
    run(&dir, &["init"]);

    household(&dir)
        .args(["household", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("household user use"));
}

#[test]
fn test_two_members_settle_a_month() {
    let dir = TempDir::new().unwrap();
    run(&dir, &["init"]);

    let out = run(&dir, &["user", "add", "Ana"]);
    assert!(out.contains("Now acting as Ana"));
    let code = invite_code(&run(&dir, &["household", "create", "Home"]));

    run(&dir, &["user", "add", "Bruno"]);
    run(&dir, &["user", "use", "Bruno"]);
    run(&dir, &["household", "join", &code]);
    run(
        &dir,
        &["expense", "add", "100", "Market", "--category", "groceries", "--date", "2025-03-04"],
    );

    run(&dir, &["user", "use", "Ana"]);
    run(
        &dir,
        &["expense", "add", "300", "Rent", "--category", "housing", "--date", "2025-03-01"],
    );

    household(&dir)
        .args(["equity", "--month", "2025-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total expenses: $400.00"))
        .stdout(predicate::str::contains("Bruno owes Ana $100.00"));

    household(&dir)
        .args(["expense", "list", "--month", "2025-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Market"))
        .stdout(predicate::str::contains("Rent"));
}

#[test]
fn test_budget_warning_reaches_both_members() {
    let dir = TempDir::new().unwrap();
    run(&dir, &["init"]);
    run(&dir, &["user", "add", "Ana"]);
    let code = invite_code(&run(&dir, &["household", "create", "Home"]));
    run(&dir, &["user", "add", "Bruno"]);
    run(&dir, &["user", "use", "Bruno"]);
    run(&dir, &["household", "join", &code]);

    run(&dir, &["budget", "set", "leisure", "100", "--month", "2025-03"]);
    household(&dir)
        .args(["expense", "add", "85", "Concert", "--category", "leisure", "--date", "2025-03-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is nearing its limit"));

    run(&dir, &["user", "use", "Ana"]);
    household(&dir)
        .args(["notification", "list", "--unread"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 unread"));
}

#[test]
fn test_export_writes_snapshot() {
    let dir = TempDir::new().unwrap();
    run(&dir, &["init"]);
    run(&dir, &["user", "add", "Ana"]);
    run(&dir, &["household", "create", "Home"]);

    let output = dir.path().join("snapshot.json");
    household(&dir)
        .args(["export", "--format", "json", "--output"])
        .arg(&output)
        .assert()
        .success();

    let json = std::fs::read_to_string(&output).unwrap();
    let snapshot = household_equity::export::read_json_snapshot(&json).unwrap();
    assert_eq!(snapshot.household.name, "Home");
}

fn couple(dir: &TempDir) {
    run(dir, &["init"]);
    run(dir, &["user", "add", "Ana"]);
    let code = invite_code(&run(dir, &["household", "create", "Home"]));
    run(dir, &["user", "add", "Bruno"]);
    run(dir, &["user", "use", "Bruno"]);
    run(dir, &["household", "join", &code]);
}

#[test]
fn test_chores_are_weighed_per_member() {
    let dir = TempDir::new().unwrap();
    couple(&dir);

    run(&dir, &["chore", "log", "Take out trash", "--date", "2025-03-02"]);
    run(&dir, &["user", "use", "Ana"]);
    run(&dir, &["chore", "define", "Water plants", "--weight", "light"]);
    run(&dir, &["chore", "log", "clean bathroom", "--hours", "2", "--date", "2025-03-03"]);
    run(&dir, &["chore", "log", "Water plants", "--date", "2025-03-04"]);

    household(&dir)
        .args(["chore", "equity", "--month", "2025-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 chores, 8 points"))
        .stdout(predicate::str::contains("Ana did 87.5% of the chores"));

    household(&dir)
        .args(["chore", "list", "--month", "2025-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Water plants"))
        .stdout(predicate::str::contains("Bruno"));

    household(&dir)
        .args(["chore", "retire", "Cook"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("built-in"));
}

#[test]
fn test_edits_and_income_summary() {
    let dir = TempDir::new().unwrap();
    couple(&dir);

    run(&dir, &["income", "add", "1000", "Freelance", "--date", "2025-03-05"]);
    run(&dir, &["user", "use", "Ana"]);
    run(&dir, &["income", "add", "3000", "Salary", "--date", "2025-03-05"]);

    household(&dir)
        .args(["income", "summary", "--month", "2025-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("75.0%"))
        .stdout(predicate::str::contains("Total: $4000.00"));

    let added = run(
        &dir,
        &["expense", "add", "100", "Market", "--category", "groceries", "--date", "2025-03-04"],
    );
    let id = added
        .lines()
        .find_map(|l| l.trim().strip_prefix("ID: "))
        .unwrap()
        .trim()
        .to_string();
    run(&dir, &["expense", "edit", &id, "--amount", "250"]);

    household(&dir)
        .args(["equity", "--month", "2025-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total expenses: $250.00"));
}

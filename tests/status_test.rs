use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn status_reports_paths_and_readiness() {
    let tmp = tempdir().expect("tempdir");

    assert_cmd::cargo::cargo_bin_cmd!("pawpicks")
        .current_dir(tmp.path())
        .env("PAWPICKS_SITE_DIR", tmp.path())
        .env("DMM_API_ID", "test-api-id")
        .env("DMM_AFFILIATE_ID", "test-affiliate-id")
        .env_remove("OPENAI_API_KEY")
        .env_remove("GOOGLE_API_KEY")
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("site_dir="))
        .stdout(predicate::str::contains("catalog credentials present"))
        .stdout(predicate::str::contains("placeholder"));
}

#[test]
fn status_flags_missing_catalog_credentials() {
    let tmp = tempdir().expect("tempdir");

    assert_cmd::cargo::cargo_bin_cmd!("pawpicks")
        .current_dir(tmp.path())
        .env("PAWPICKS_SITE_DIR", tmp.path())
        .env_remove("DMM_API_ID")
        .env_remove("DMM_AFFILIATE_ID")
        .arg("status")
        .assert()
        .failure()
        .stdout(predicate::str::contains("catalog credentials missing"));
}

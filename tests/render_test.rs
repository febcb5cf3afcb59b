use std::fs;
use tempfile::tempdir;

const HISTORY: &str = r#"[
  {
    "date": "2025/10/21",
    "filename": "recommend_20251021.html",
    "items": [
      {
        "title": "猫用キャットタワー",
        "url": "https://example.com/tower",
        "image": "https://example.com/tower.jpg",
        "price": 4980,
        "source": "DMM"
      }
    ]
  },
  {
    "date": "2025/10/20",
    "filename": "recommend_20251020.html",
    "items": [
      {
        "title": "犬用おやつ",
        "url": "https://example.com/treats",
        "image": "",
        "price": "要問い合わせ",
        "source": "DMM"
      }
    ]
  }
]"#;

const CURRENT: &str = r#"[
  {
    "title": "猫用キャットタワー",
    "url": "https://example.com/tower",
    "image": "https://example.com/tower.jpg",
    "price": 4980,
    "source": "DMM"
  }
]"#;

#[test]
fn render_writes_archive_pages_and_homepage() {
    let tmp = tempdir().expect("tempdir");
    fs::write(tmp.path().join("history.json"), HISTORY).expect("write history");
    fs::write(tmp.path().join("current_week.json"), CURRENT).expect("write current");

    assert_cmd::cargo::cargo_bin_cmd!("pawpicks")
        .current_dir(tmp.path())
        .env("PAWPICKS_SITE_DIR", tmp.path())
        .env_remove("OPENAI_API_KEY")
        .env_remove("GOOGLE_API_KEY")
        .arg("render")
        .assert()
        .success();

    assert!(tmp.path().join("recommend_20251021.html").exists());
    assert!(tmp.path().join("recommend_20251020.html").exists());

    let index = fs::read_to_string(tmp.path().join("index.html")).expect("read index");
    assert!(index.contains("今週のおすすめペット商品"));
    assert!(index.contains("4,980円"));
    // No provider keys in the environment, so the placeholder stands in.
    assert!(index.contains("説明文を生成できませんでした。"));
    // The shared sidebar links both archive days.
    assert!(index.contains("recommend_20251021.html"));
    assert!(index.contains("recommend_20251020.html"));

    let daily = fs::read_to_string(tmp.path().join("recommend_20251020.html"))
        .expect("read daily page");
    assert!(daily.contains("2025/10/20 のおすすめペット商品"));
    assert!(daily.contains("要問い合わせ"));
    assert!(daily.contains("recommend_20251021.html"));
}

#[test]
fn render_with_corrupt_history_skips_archive_but_keeps_homepage() {
    let tmp = tempdir().expect("tempdir");
    fs::write(tmp.path().join("history.json"), "[{\"date\": ").expect("write history");
    fs::write(tmp.path().join("current_week.json"), CURRENT).expect("write current");

    assert_cmd::cargo::cargo_bin_cmd!("pawpicks")
        .current_dir(tmp.path())
        .env("PAWPICKS_SITE_DIR", tmp.path())
        .env_remove("OPENAI_API_KEY")
        .env_remove("GOOGLE_API_KEY")
        .arg("render")
        .assert()
        .success();

    let index = fs::read_to_string(tmp.path().join("index.html")).expect("read index");
    assert!(index.contains("過去のオススメ履歴はありません。"));
}

#[test]
fn render_without_current_selection_skips_homepage() {
    let tmp = tempdir().expect("tempdir");
    fs::write(tmp.path().join("history.json"), HISTORY).expect("write history");

    assert_cmd::cargo::cargo_bin_cmd!("pawpicks")
        .current_dir(tmp.path())
        .env("PAWPICKS_SITE_DIR", tmp.path())
        .env_remove("OPENAI_API_KEY")
        .env_remove("GOOGLE_API_KEY")
        .arg("render")
        .assert()
        .success();

    assert!(!tmp.path().join("index.html").exists());
    assert!(tmp.path().join("recommend_20251021.html").exists());
}

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::site::describe::{self, DescriptionProvider};
use crate::site::history::{Item, Price};

const PAGE_CSS: &str = r#"
        .header-container {
            display: flex;
            align-items: center;
            justify-content: center;
            margin-bottom: 20px;
        }
        .header-title-box {
            border: 3px solid #000;
            padding: 10px 30px;
            margin: 0 20px;
            text-align: center;
            flex-grow: 1;
        }
        .header-title-box h1 {
            margin: 0;
            font-size: 2em;
        }
        .header-image {
            width: 80px;
            height: 80px;
            border-radius: 50%;
            border: 2px solid #000;
            overflow: hidden;
        }
        .header-image img {
            width: 100%;
            height: 100%;
            object-fit: cover;
            display: block;
        }

        body { font-family: sans-serif; }
        #container { width: 90%; max-width: 1000px; margin: 20px auto; display: flex; border: 1px solid #ddd; padding: 10px; }
        #sidebar { width: 220px; padding: 10px 15px; border-right: 1px solid #eee; margin-right: 20px; }
        #main-content { flex-grow: 1; }

        .history-list h3 { margin-top: 0; border-bottom: 2px solid #ccc; padding-bottom: 5px; }
        .history-date { font-size: 0.9em; margin: 3px 0; }
        .history-date a { color: #007bff; text-decoration: none; }
        .history-date.history-more { font-style: italic; color: #888; }

        ul { list-style-type: none; padding: 0; }
        li { border-bottom: 1px solid #ccc; margin-bottom: 20px; padding: 15px 0; }
        img { display: block; margin: 10px 0; border-radius: 4px; max-width: 150px; height: auto; }
        p { margin: 5px 0; }
        .price { font-weight: bold; color: #E91E63; font-size: 1.1em; }
"#;

/// Integer-valued prices get thousands separators and 「円」; anything
/// else (including numeric-looking tokens that fail to parse) is shown
/// verbatim.
pub fn format_price(price: &Price) -> String {
    let yen = match price {
        Price::Yen(n) => Some(*n),
        Price::Token(s) => s.trim().parse::<i64>().ok(),
    };
    match yen {
        Some(n) => format!("{}円", group_thousands(n)),
        None => match price {
            Price::Token(s) => s.clone(),
            Price::Yen(n) => n.to_string(),
        },
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if n < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn item_html(item: &Item, description: &str) -> String {
    format!(
        r#"
        <li>
            <h2>{title}</h2>
            <a href="{url}" target="_blank">
                <img src="{image}" alt="{title}" width="150">
            </a>
            <p class="price">価格: {price}</p>
            <p>{description}</p>
            <p><a href="{url}" target="_blank">商品ページへ</a></p>
        </li>
"#,
        title = item.title,
        url = item.url,
        image = item.image,
        price = format_price(&item.price),
    )
}

fn page_html(page_title: &str, sidebar_html: &str, items_html: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
    <meta charset="UTF-8">
    <title>{page_title}</title>
    <style>{PAGE_CSS}</style>
</head>
<body>

<div class="header-container">
    <div class="header-image">
        <img src="header_left.jpg" alt="サイトイメージ画像 左">
    </div>
    <div class="header-title-box">
        <h1>わんニャン！アフェリペット</h1>
    </div>
    <div class="header-image">
        <img src="header_right.jpg" alt="サイトイメージ画像 右">
    </div>
</div>
<div id="container">
    <div id="sidebar">
        {sidebar_html}
    </div>
    <div id="main-content">
        <h2>{page_title}</h2>
        <p class="recommend-label">今週のオススメ</p>
        <ul>
{items_html}
        </ul>
    </div>
</div>
</body>
</html>"#
    )
}

/// Render one page: generate a description per item through the
/// provider chain, fill the shared template, and write the file.
pub fn write_page(
    path: &Path,
    page_title: &str,
    items: &[Item],
    sidebar_html: &str,
    providers: &[Box<dyn DescriptionProvider>],
) -> Result<()> {
    let mut items_html = String::new();
    for item in items {
        let description = describe::describe(providers, &item.title);
        items_html.push_str(&item_html(item, &description));
    }

    let html = page_html(page_title, sidebar_html, &items_html);
    fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))
}

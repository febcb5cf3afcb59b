use crate::site::history::HistoryLog;

/// Display cap for the sidebar. Coincidentally equal to the retention
/// window, but a presentation limit, not a retention rule.
pub const DISPLAY_LIMIT: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub display_date: String,
    pub link_target: String,
}

#[derive(Debug, Clone, Default)]
pub struct Sidebar {
    pub entries: Vec<SidebarEntry>,
    pub omitted: usize,
}

/// Derive the navigable history list from the already-pruned log.
/// Order is taken from the log as-is (most-recent-first); never re-sort.
pub fn build(log: &HistoryLog) -> Sidebar {
    let entries = log
        .records
        .iter()
        .take(DISPLAY_LIMIT)
        .map(|record| SidebarEntry {
            display_date: record.date.clone(),
            link_target: if record.filename.is_empty() {
                "index.html".to_string()
            } else {
                record.filename.clone()
            },
        })
        .collect();
    let omitted = log.records.len().saturating_sub(DISPLAY_LIMIT);
    Sidebar { entries, omitted }
}

/// The shared sidebar fragment, built once per run and embedded
/// identically in every page.
pub fn to_html(sidebar: &Sidebar) -> String {
    let mut html = String::from("<div class=\"history-list\">\n");

    if sidebar.entries.is_empty() {
        html.push_str("<p>過去のオススメ履歴はありません。</p>");
    } else {
        html.push_str("<h3>過去のオススメ</h3>\n");
        for entry in &sidebar.entries {
            html.push_str(&format!(
                "  <p class=\"history-date\"><a href=\"{}\">{}</a></p>\n",
                entry.link_target, entry.display_date
            ));
        }
        if sidebar.omitted > 0 {
            html.push_str(&format!(
                "  <p class=\"history-date history-more\">... 他 {}日分</p>\n",
                sidebar.omitted
            ));
        }
    }

    html.push_str("</div>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::{DISPLAY_LIMIT, build, to_html};
    use crate::site::history::{DailyRecord, HistoryLog};

    fn log_of(n: usize) -> HistoryLog {
        HistoryLog {
            records: (0..n)
                .map(|i| DailyRecord {
                    date: format!("2025/10/{:02}", (i % 28) + 1),
                    filename: format!("recommend_202510{:02}.html", (i % 28) + 1),
                    items: vec![],
                })
                .collect(),
        }
    }

    #[test]
    fn keeps_log_order_and_links() {
        let sidebar = build(&log_of(3));

        assert_eq!(sidebar.entries.len(), 3);
        assert_eq!(sidebar.omitted, 0);
        assert_eq!(sidebar.entries[0].display_date, "2025/10/01");
        assert_eq!(sidebar.entries[0].link_target, "recommend_20251001.html");
    }

    #[test]
    fn caps_entries_and_counts_overflow() {
        let sidebar = build(&log_of(34));

        assert_eq!(sidebar.entries.len(), DISPLAY_LIMIT);
        assert_eq!(sidebar.omitted, 4);

        let html = to_html(&sidebar);
        assert!(html.contains("... 他 4日分"));
    }

    #[test]
    fn missing_filename_links_home() {
        let log = HistoryLog {
            records: vec![DailyRecord {
                date: "2025/10/21".to_string(),
                filename: String::new(),
                items: vec![],
            }],
        };

        let sidebar = build(&log);
        assert_eq!(sidebar.entries[0].link_target, "index.html");
    }

    #[test]
    fn empty_log_renders_placeholder() {
        let html = to_html(&build(&HistoryLog::default()));
        assert!(html.contains("過去のオススメ履歴はありません。"));
    }
}

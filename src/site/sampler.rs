use rand::seq::SliceRandom;

use crate::site::history::Item;

/// Pick `min(count, pool.len())` distinct items uniformly at random.
/// Unseeded on purpose: each day's run should rotate the selection.
pub fn sample_items(pool: &[Item], count: usize) -> Vec<Item> {
    let mut rng = rand::thread_rng();
    pool.choose_multiple(&mut rng, count.min(pool.len()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::sample_items;
    use crate::site::history::{Item, Price};
    use std::collections::HashSet;

    fn pool(n: usize) -> Vec<Item> {
        (0..n)
            .map(|i| Item {
                title: format!("item-{i}"),
                url: format!("https://example.com/{i}"),
                image: String::new(),
                price: Price::Yen(i as i64),
                source: "DMM".to_string(),
            })
            .collect()
    }

    #[test]
    fn small_pool_returns_everything() {
        let pool = pool(3);
        let picked = sample_items(&pool, 5);

        assert_eq!(picked.len(), 3);
        let urls: HashSet<&str> = picked.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls.len(), 3);
    }

    #[test]
    fn large_pool_is_bounded_distinct_and_from_pool() {
        let pool = pool(40);
        let picked = sample_items(&pool, 5);

        assert_eq!(picked.len(), 5);
        let urls: HashSet<&str> = picked.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls.len(), 5);
        for item in &picked {
            assert!(pool.iter().any(|p| p.url == item.url));
        }
    }

    #[test]
    fn empty_pool_yields_empty_selection() {
        assert!(sample_items(&[], 5).is_empty());
    }
}

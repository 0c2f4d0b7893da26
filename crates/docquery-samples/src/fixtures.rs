//! Deterministic sample data
//!
//! Post `n` (1-based) gets `Title{n}`, `Body{n}` and `AuthorName{n}`, the tags
//! `python`, `c++` and `c#`, and ten comments `Body{k}` / `AuthorName{k}`.
//! Creation dates advance by one day per post starting at 2010-01-01 UTC.

use crate::model::{Comment, Post, PostStatistics};
use chrono::{DateTime, Duration, Utc};

/// Tags carried by every generated post
pub const SAMPLE_TAGS: [&str; 3] = ["python", "c++", "c#"];

/// Comments per generated post
pub const COMMENTS_PER_POST: usize = 10;

/// Days from the Unix epoch to 2010-01-01
const BASE_DAY: i64 = 14_610;

fn day(offset: i64) -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + Duration::days(BASE_DAY + offset)
}

/// Generate `count` posts with ids `1..=count`.
pub fn sample_posts(count: usize) -> Vec<Post> {
    (1..=count).map(sample_post).collect()
}

fn sample_post(n: usize) -> Post {
    let id = n as i32;
    let created = day(n as i64);
    Post {
        id,
        title: format!("Title{}", n),
        body: format!("Body{}", n),
        author_name: format!("AuthorName{}", n),
        creation_date: created,
        last_modify_date: created + Duration::hours(1),
        tags: SAMPLE_TAGS.iter().map(|t| t.to_string()).collect(),
        comments: sample_comments(created),
        statistics: PostStatistics {
            votes_count: id % 7,
            views_count: (id * 3) % 10,
        },
    }
}

fn sample_comments(post_created: DateTime<Utc>) -> Vec<Comment> {
    (1..=COMMENTS_PER_POST)
        .map(|k| Comment {
            body: format!("Body{}", k),
            author_name: format!("AuthorName{}", k),
            creation_date: post_created + Duration::minutes(k as i64),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_sequential() {
        let posts = sample_posts(30);
        let ids: Vec<i32> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, (1..=30).collect::<Vec<_>>());
    }

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(sample_posts(5), sample_posts(5));
    }

    #[test]
    fn test_shape_of_post() {
        let post = &sample_posts(30)[0];
        assert_eq!(post.title, "Title1");
        assert_eq!(post.author_name, "AuthorName1");
        assert_eq!(post.tags, vec!["python", "c++", "c#"]);
        assert_eq!(post.comments.len(), COMMENTS_PER_POST);
        assert_eq!(post.comments[1].author_name, "AuthorName2");
        assert_eq!(post.creation_date.to_rfc3339(), "2010-01-02T00:00:00+00:00");
    }

    #[test]
    fn test_creation_dates_are_distinct() {
        let posts = sample_posts(30);
        let dates: HashSet<_> = posts.iter().map(|p| p.creation_date).collect();
        assert_eq!(dates.len(), 30);
    }

    #[test]
    fn test_statistics_vary() {
        let posts = sample_posts(30);
        let votes: HashSet<i32> = posts.iter().map(|p| p.statistics.votes_count).collect();
        assert_eq!(votes.len(), 7);
        assert_eq!(
            posts.iter().filter(|p| p.statistics.votes_count == 3).count(),
            4
        );
    }
}

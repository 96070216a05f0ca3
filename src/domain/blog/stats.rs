//! Aggregates over a list of blogs

use serde::Serialize;

use super::entity::Blog;

/// Author with the number of blogs they wrote
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorBlogs {
    pub author: String,
    pub blogs: usize,
}

/// Author with the total likes across their blogs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorLikes {
    pub author: String,
    pub likes: u64,
}

/// Sum of likes, saturating at `u64::MAX`
pub fn total_likes(blogs: &[Blog]) -> u64 {
    blogs
        .iter()
        .fold(0, |total: u64, blog| total.saturating_add(blog.likes()))
}

/// Blog with the most likes; the earliest one wins a tie
pub fn favorite_blog(blogs: &[Blog]) -> Option<&Blog> {
    blogs.iter().fold(None, |best: Option<&Blog>, blog| match best {
        Some(b) if b.likes() >= blog.likes() => Some(b),
        _ => Some(blog),
    })
}

/// Author with the most blogs; blogs without an author are skipped
pub fn most_blogs(blogs: &[Blog]) -> Option<AuthorBlogs> {
    tally(blogs, |_| 1)
        .into_iter()
        .map(|(author, blogs)| AuthorBlogs {
            author,
            blogs: blogs as usize,
        })
        .fold(None, |best: Option<AuthorBlogs>, candidate| match best {
            Some(b) if b.blogs >= candidate.blogs => Some(b),
            _ => Some(candidate),
        })
}

/// Author whose blogs have the most likes in total
pub fn most_likes(blogs: &[Blog]) -> Option<AuthorLikes> {
    tally(blogs, Blog::likes)
        .into_iter()
        .map(|(author, likes)| AuthorLikes { author, likes })
        .fold(None, |best: Option<AuthorLikes>, candidate| match best {
            Some(b) if b.likes >= candidate.likes => Some(b),
            _ => Some(candidate),
        })
}

/// Per-author saturating sums in order of first appearance
fn tally(blogs: &[Blog], weight: impl Fn(&Blog) -> u64) -> Vec<(String, u64)> {
    let mut totals: Vec<(String, u64)> = Vec::new();

    for blog in blogs {
        let Some(author) = blog.author() else {
            continue;
        };

        match totals.iter_mut().find(|(a, _)| a == author) {
            Some((_, total)) => *total = total.saturating_add(weight(blog)),
            None => totals.push((author.to_string(), weight(blog))),
        }
    }

    totals
}

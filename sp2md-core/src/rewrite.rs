//! Finds site-relative images in a markdown body and flattens them to local paths.
//!
//! Only targets starting with `/` belong to the source site. Each one is
//! rewritten to `/<basename>` everywhere it appears in the body, and reported
//! once as an [`AssetReference`] so the coordinator downloads it once.

use regex::Regex;

/// An embedded asset that points back at the source site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReference {
    /// The target exactly as it appeared in the body, e.g. `/sites/blog/img.png`.
    pub original_path: String,
    /// Basename of `original_path`; the file name on disk.
    pub local_name: String,
    /// `site_url + original_path`.
    pub resolved_download_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenBody {
    pub body: String,
    /// Distinct references in first-seen order.
    pub references: Vec<AssetReference>,
}

pub struct UrlRewriter {
    site_url: String,
    image: Regex,
}

impl UrlRewriter {
    pub fn new(site_url: &str) -> Self {
        Self {
            // avoid "//" when joining with the leading slash of a target
            site_url: site_url.trim_end_matches('/').to_string(),
            image: Regex::new(r"!\[([^\]]*)\]\(([^)]*)\)").expect("static image pattern"),
        }
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    pub fn rewrite(&self, body: &str) -> RewrittenBody {
        let mut references: Vec<AssetReference> = Vec::new();
        // Every distinct eligible target, including ones whose basename was
        // already claimed by an earlier target; all of them get flattened.
        let mut plan: Vec<(&str, &str)> = Vec::new();

        for caps in self.image.captures_iter(body) {
            let target = caps.get(2).map_or("", |m| m.as_str());
            if !target.starts_with('/') {
                continue;
            }
            if plan.iter().any(|(original, _)| *original == target) {
                continue;
            }
            let Some(local_name) = local_name(target) else {
                tracing::debug!(image_target = %target, "Skipping image target without a file name");
                continue;
            };
            plan.push((target, local_name));

            if let Some(first) = references.iter().find(|r| r.local_name == local_name) {
                tracing::warn!(
                    image_target = %target,
                    kept = %first.original_path,
                    local_name = %local_name,
                    "File name already used in this post, keeping the first download"
                );
                continue;
            }
            references.push(AssetReference {
                original_path: target.to_string(),
                local_name: local_name.to_string(),
                resolved_download_url: format!("{}{}", self.site_url, target),
            });
        }

        // Longest first, so a target that is a suffix of another one cannot
        // clobber the longer target before it is rewritten.
        plan.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let mut rewritten = body.to_string();
        for (original, local_name) in plan {
            rewritten = rewritten.replace(original, &format!("/{local_name}"));
        }

        RewrittenBody {
            body: rewritten,
            references,
        }
    }
}

/// Everything after the last `/`, or `None` when that does not name a file
/// (empty, `.` or `..`).
fn local_name(target: &str) -> Option<&str> {
    target
        .rsplit('/')
        .next()
        .filter(|name| !matches!(*name, "" | "." | ".."))
}

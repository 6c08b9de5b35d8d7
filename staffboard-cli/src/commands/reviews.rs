//! Reviews command - query and manage staff reviews

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Subcommand};
use serde_json::Value;
use staffboard_core::{Config, FallbackPool, NewReview, Review, ReviewSelector, StaffId};
use staffboard_db::{Database, ReviewsRepo};

/// Manage and query staff reviews
#[derive(Args, Debug)]
pub struct ReviewsArgs {
    #[command(subcommand)]
    pub command: ReviewsCommand,
}

#[derive(Subcommand, Debug)]
pub enum ReviewsCommand {
    /// Show the reviews selected for a staff profile
    Top {
        /// Staff member identifier
        staff_id: String,
    },

    /// Add a review
    Add {
        /// Staff member identifier
        #[arg(long)]
        staff_id: String,

        /// Reviewer display name
        #[arg(long)]
        customer: String,

        /// Rating from 1 to 5
        #[arg(long)]
        stars: u8,

        /// Review text
        #[arg(long, default_value = "")]
        text: String,

        /// Classification tag
        #[arg(long = "type", default_value = "testimonial")]
        review_type: String,

        /// Mark the review as featured
        #[arg(long)]
        featured: bool,
    },

    /// List all reviews for a staff member, newest first
    #[command(visible_alias = "ls")]
    List {
        /// Staff member identifier
        staff_id: String,
    },

    /// Feature a review (or un-feature it with --off)
    Feature {
        /// Review identifier
        id: String,

        /// Clear the featured flag instead of setting it
        #[arg(long)]
        off: bool,
    },

    /// Delete a review
    Delete {
        /// Review identifier
        id: String,
    },

    /// Import review documents from a JSON file
    Import {
        /// File holding a JSON array of review documents
        file: PathBuf,
    },
}

impl ReviewsArgs {
    /// Execute the reviews command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let db = Database::open(&config.database)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to open database: {}", e))?;
        let repo = db.reviews();

        match &self.command {
            ReviewsCommand::Top { staff_id } => {
                let staff_id = StaffId::parse(staff_id)?;
                let selector = ReviewSelector::with_fallback(
                    Arc::new(repo),
                    FallbackPool::from_config(&config.reviews),
                );
                let reviews = selector.select_top_reviews(&staff_id).await?;
                println!("{}", serde_json::to_string_pretty(&reviews)?);
            }
            ReviewsCommand::Add {
                staff_id,
                customer,
                stars,
                text,
                review_type,
                featured,
            } => {
                let new = NewReview {
                    staff_id: staff_id.clone(),
                    customer_name: customer.clone(),
                    stars: *stars,
                    text: text.clone(),
                    review_type: review_type.clone(),
                    featured_review: *featured,
                };
                let review = repo.insert(&new).await?;
                println!("Created review {}", review.id);
            }
            ReviewsCommand::List { staff_id } => {
                let staff_id = StaffId::parse(staff_id)?;
                let (total, reviews) = staff_listing(&repo, &staff_id).await?;

                if total == 0 {
                    println!("No reviews for {}.", staff_id);
                } else {
                    println!("Reviews for {} ({}):", staff_id, total);
                    println!();
                    for review in &reviews {
                        print_review(review);
                    }
                }
            }
            ReviewsCommand::Feature { id, off } => {
                repo.set_featured(id, !off).await?;
                if *off {
                    println!("Review {} is no longer featured", id);
                } else {
                    println!("Review {} is now featured", id);
                }
            }
            ReviewsCommand::Delete { id } => {
                repo.delete(id).await?;
                println!("Deleted review {}", id);
            }
            ReviewsCommand::Import { file } => {
                let contents = std::fs::read_to_string(file)?;
                let (reviews, skipped) = parse_documents(&contents)?;

                for review in &reviews {
                    repo.upsert(review).await?;
                }

                if skipped > 0 {
                    tracing::warn!(skipped, "Skipped documents without id or staffId");
                }
                println!(
                    "Imported {} review(s) from {} ({} skipped)",
                    reviews.len(),
                    file.display(),
                    skipped
                );
            }
        }

        db.close().await;
        Ok(())
    }
}

/// Review count and newest-first listing for a staff member
async fn staff_listing(
    repo: &ReviewsRepo,
    staff_id: &StaffId,
) -> anyhow::Result<(i64, Vec<Review>)> {
    let total = repo.count_by_staff(staff_id).await?;
    if total == 0 {
        return Ok((0, Vec::new()));
    }
    let reviews = repo.find_by_staff(staff_id).await?;
    Ok((total, reviews))
}

fn print_review(review: &Review) {
    let stars = review
        .stars
        .map(|s| "*".repeat(s as usize))
        .unwrap_or_else(|| "-".to_string());
    let featured = if review.featured_review { " [featured]" } else { "" };

    println!("  {} {}{}", review.id, stars, featured);
    println!("      From: {}", review.customer_name);
    if let Some(created_at) = review.created_at {
        println!("      Date: {}", created_at.format("%Y-%m-%d"));
    }
    if !review.text.is_empty() {
        println!("      {}", review.text);
    }
    println!();
}

/// Parse a JSON array (or single object) of raw review documents
///
/// Returns the usable reviews and the number of documents skipped.
fn parse_documents(contents: &str) -> anyhow::Result<(Vec<Review>, usize)> {
    let docs = match serde_json::from_str::<Value>(contents)? {
        Value::Array(docs) => docs,
        doc @ Value::Object(_) => vec![doc],
        _ => anyhow::bail!("Expected a JSON array of review documents"),
    };

    let total = docs.len();
    let reviews: Vec<Review> = docs.iter().filter_map(Review::from_document).collect();
    let skipped = total - reviews.len();

    Ok((reviews, skipped))
}

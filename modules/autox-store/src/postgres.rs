// Postgres persistence for topics and posts.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use autox_common::types::{
    GeneratedPost, PostStatus, RawTopic, ScoreBreakdown, ScoredTopic, TopicStatus, Variant,
};

use crate::traits::{PostStore, StoreCounts, TopicStore};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct RawTopicRow {
    title: String,
    category: String,
    source_link: String,
    x_trending: bool,
    trend_rank: i32,
    collected_at: String,
}

impl From<RawTopicRow> for RawTopic {
    fn from(r: RawTopicRow) -> Self {
        RawTopic {
            title: r.title,
            category: r.category,
            source_link: r.source_link,
            x_trending: r.x_trending,
            trend_rank: r.trend_rank,
            collected_at: r.collected_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ScoredTopicRow {
    title: String,
    date: String,
    category: String,
    source_link: String,
    x_trending: bool,
    trend_rank: i32,
    score: i32,
    score_breakdown: Json<ScoreBreakdown>,
    status: String,
    created_at: DateTime<Utc>,
}

impl From<ScoredTopicRow> for ScoredTopic {
    fn from(r: ScoredTopicRow) -> Self {
        ScoredTopic {
            title: r.title,
            category: r.category,
            source_link: r.source_link,
            x_trending: r.x_trending,
            trend_rank: r.trend_rank,
            score: r.score,
            score_breakdown: r.score_breakdown.0,
            date: r.date,
            status: TopicStatus::from_str_loose(&r.status),
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    topic: String,
    source: String,
    category: Option<String>,
    tweet_variants: Json<Vec<Variant>>,
    status: String,
    enhanced: bool,
    generated_at: DateTime<Utc>,
    posted_at: Option<DateTime<Utc>>,
}

impl From<PostRow> for GeneratedPost {
    fn from(r: PostRow) -> Self {
        GeneratedPost {
            id: r.id,
            topic: r.topic,
            source: r.source,
            category: r.category,
            tweet_variants: r.tweet_variants.0,
            status: PostStatus::from_str_loose(&r.status),
            enhanced: r.enhanced,
            generated_at: r.generated_at,
            posted_at: r.posted_at,
        }
    }
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .context("Failed to connect to Postgres")?;
        debug!("Postgres pool ready");
        Ok(Self::new(pool))
    }

    /// Run the embedded SQL migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run migrations")?;
        info!("Migrations applied");
        Ok(())
    }

    pub async fn counts(&self) -> Result<StoreCounts> {
        let (raw_topics, top_topics, final_posts, ready_posts) =
            sqlx::query_as::<_, (i64, i64, i64, i64)>(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM raw_topics),
                    (SELECT COUNT(*) FROM top_topics),
                    (SELECT COUNT(*) FROM final_posts),
                    (SELECT COUNT(*) FROM final_posts WHERE status = 'ready_for_posting')
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        Ok(StoreCounts {
            raw_topics,
            top_topics,
            final_posts,
            ready_posts,
        })
    }
}

#[async_trait]
impl TopicStore for PgStore {
    async fn upsert_raw_topic(&self, topic: &RawTopic) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO raw_topics (title, category, source_link, x_trending, trend_rank, collected_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (title) DO UPDATE SET
                category = EXCLUDED.category,
                source_link = EXCLUDED.source_link,
                x_trending = EXCLUDED.x_trending,
                trend_rank = EXCLUDED.trend_rank,
                collected_at = EXCLUDED.collected_at
            "#,
        )
        .bind(&topic.title)
        .bind(&topic.category)
        .bind(&topic.source_link)
        .bind(topic.x_trending)
        .bind(topic.trend_rank)
        .bind(&topic.collected_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn raw_topics_for_date(&self, date: &str) -> Result<Vec<RawTopic>> {
        let rows = sqlx::query_as::<_, RawTopicRow>(
            r#"
            SELECT title, category, source_link, x_trending, trend_rank, collected_at
            FROM raw_topics
            WHERE collected_at = $1
            ORDER BY seq
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn upsert_scored_topic(&self, topic: &ScoredTopic) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO top_topics
                (title, date, category, source_link, x_trending, trend_rank,
                 score, score_breakdown, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (title, date) DO UPDATE SET
                category = EXCLUDED.category,
                source_link = EXCLUDED.source_link,
                x_trending = EXCLUDED.x_trending,
                trend_rank = EXCLUDED.trend_rank,
                score = EXCLUDED.score,
                score_breakdown = EXCLUDED.score_breakdown,
                created_at = EXCLUDED.created_at,
                status = CASE
                    WHEN top_topics.status = 'completed' THEN top_topics.status
                    ELSE EXCLUDED.status
                END
            "#,
        )
        .bind(&topic.title)
        .bind(&topic.date)
        .bind(&topic.category)
        .bind(&topic.source_link)
        .bind(topic.x_trending)
        .bind(topic.trend_rank)
        .bind(topic.score)
        .bind(Json(topic.score_breakdown))
        .bind(topic.status.to_string())
        .bind(topic.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn topics_with_status(&self, status: TopicStatus) -> Result<Vec<ScoredTopic>> {
        let rows = sqlx::query_as::<_, ScoredTopicRow>(
            r#"
            SELECT title, date, category, source_link, x_trending, trend_rank,
                   score, score_breakdown, status, created_at
            FROM top_topics
            WHERE status = $1
            ORDER BY id
            "#,
        )
        .bind(status.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn mark_topic_completed(&self, title: &str, date: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE top_topics SET status = $3 WHERE title = $1 AND date = $2")
            .bind(title)
            .bind(date)
            .bind(TopicStatus::Completed.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl PostStore for PgStore {
    async fn insert_post(&self, post: &GeneratedPost) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO final_posts
                (id, topic, source, category, tweet_variants, status, enhanced, generated_at, posted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(post.id)
        .bind(&post.topic)
        .bind(&post.source)
        .bind(&post.category)
        .bind(Json(&post.tweet_variants))
        .bind(post.status.to_string())
        .bind(post.enhanced)
        .bind(post.generated_at)
        .bind(post.posted_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn pending_enrichment(&self) -> Result<Vec<GeneratedPost>> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT * FROM final_posts
            WHERE status = 'ready_for_posting' AND enhanced = FALSE
            ORDER BY generated_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn save_enrichment(&self, id: Uuid, variants: &[Variant]) -> Result<()> {
        sqlx::query("UPDATE final_posts SET tweet_variants = $2, enhanced = TRUE WHERE id = $1")
            .bind(id)
            .bind(Json(variants))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ready_posts(&self) -> Result<Vec<GeneratedPost>> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT * FROM final_posts
            WHERE status = 'ready_for_posting'
            ORDER BY enhanced DESC, generated_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn mark_posted(&self, id: Uuid, posted_at: DateTime<Utc>) -> Result<bool> {
        let result =
            sqlx::query("UPDATE final_posts SET status = 'posted', posted_at = $2 WHERE id = $1")
                .bind(id)
                .bind(posted_at)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}

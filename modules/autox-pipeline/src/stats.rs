use std::time::Duration;

/// Outcome of one selector run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionStats {
    pub raw_topics: u32,
    pub blocked: u32,
    pub scored: u32,
    /// Titles upserted, best first.
    pub selected: Vec<String>,
}

impl std::fmt::Display for SelectionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Topic Selection ===")?;
        writeln!(f, "Raw topics:  {}", self.raw_topics)?;
        writeln!(f, "Blocked:     {}", self.blocked)?;
        writeln!(f, "Scored:      {}", self.scored)?;
        writeln!(f, "Selected:    {}", self.selected.len())?;
        for (i, title) in self.selected.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, title)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub pending: u32,
    pub generated: u32,
    pub draft_failed: u32,
    pub refine_failed: u32,
}

impl std::fmt::Display for GenerationStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Post Generation ===")?;
        writeln!(f, "Pending topics:   {}", self.pending)?;
        writeln!(f, "Posts generated:  {}", self.generated)?;
        writeln!(f, "Draft failures:   {}", self.draft_failed)?;
        writeln!(f, "Refine failures:  {}", self.refine_failed)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentStats {
    pub pending: u32,
    pub enhanced: u32,
    pub skipped_empty: u32,
    pub variants: u32,
    /// Variants that got the fallback comment.
    pub fallback_comments: u32,
}

impl std::fmt::Display for EnrichmentStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Enrichment ===")?;
        writeln!(f, "Pending posts:      {}", self.pending)?;
        writeln!(f, "Posts enhanced:     {}", self.enhanced)?;
        writeln!(f, "Skipped (empty):    {}", self.skipped_empty)?;
        writeln!(f, "Variants enriched:  {}", self.variants)?;
        writeln!(f, "Fallback comments:  {}", self.fallback_comments)?;
        Ok(())
    }
}

/// Stats and wall-clock time of a full `run`.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub selection: SelectionStats,
    pub generation: GenerationStats,
    pub enrichment: EnrichmentStats,
    pub durations: Vec<(&'static str, Duration)>,
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.selection, self.generation, self.enrichment)?;
        writeln!(f, "\nStage durations:")?;
        for (stage, elapsed) in &self.durations {
            writeln!(f, "  {stage:<10} {:.1}s", elapsed.as_secs_f64())?;
        }
        Ok(())
    }
}

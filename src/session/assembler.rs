use super::pipeline::ChunkResult;

/// Join resolved chunk transcripts in chunk-id order
///
/// Chunks complete in arbitrary order; this is the one place that restores
/// ordering. Failed chunks (absent transcript) contribute nothing — they
/// are omitted entirely, not rendered as a placeholder. Deterministic and
/// pure; re-invoked after every chunk resolution.
pub fn assemble(results: &[ChunkResult]) -> String {
    let mut ordered: Vec<&ChunkResult> = results.iter().collect();
    ordered.sort_by_key(|result| result.id);

    ordered
        .iter()
        .filter_map(|result| result.transcript.as_deref())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: u64, transcript: Option<&str>) -> ChunkResult {
        ChunkResult {
            id,
            transcript: transcript.map(String::from),
        }
    }

    #[test]
    fn test_assemble_orders_by_id() {
        let results = vec![
            result(2, Some("later")),
            result(0, Some("first")),
            result(1, Some("middle")),
        ];

        assert_eq!(assemble(&results), "first middle later");
    }

    #[test]
    fn test_assemble_omits_absent_transcripts() {
        let results = vec![
            result(0, Some("kept")),
            result(1, None),
            result(2, Some("also kept")),
        ];

        assert_eq!(
            assemble(&results),
            "kept also kept",
            "failed chunks must not leave a placeholder token"
        );
    }

    #[test]
    fn test_assemble_empty_and_all_absent() {
        assert_eq!(assemble(&[]), "");
        assert_eq!(assemble(&[result(0, None), result(1, None)]), "");
    }

    #[test]
    fn test_assemble_is_completion_order_independent() {
        let a = vec![result(0, Some("a")), result(1, Some("b"))];
        let b = vec![result(1, Some("b")), result(0, Some("a"))];

        assert_eq!(assemble(&a), assemble(&b));
    }
}

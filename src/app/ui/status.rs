use crate::bubbles::SelectionInfo;

/// Status line for the current selection, in the chart's "#N most common
/// word" phrasing.
pub(in crate::app) fn status_message(selected: Option<&str>, info: Option<SelectionInfo>) -> String {
    match (selected.map(str::trim).filter(|id| !id.is_empty()), info) {
        (None, _) => "No word is selected".to_owned(),
        (Some(id), Some(info)) => {
            format!("The word {id} was the #{} most common word", info.rank)
        }
        (Some(id), None) => format!("The word {id} is not in this text"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_selection() {
        assert_eq!(status_message(None, None), "No word is selected");
        assert_eq!(status_message(Some("  "), None), "No word is selected");
    }

    #[test]
    fn known_word_reports_its_rank() {
        let info = SelectionInfo {
            index: 4,
            rank: 12,
            value: 310,
        };
        assert_eq!(
            status_message(Some("college"), Some(info)),
            "The word college was the #12 most common word"
        );
    }

    #[test]
    fn unknown_word_is_called_out() {
        assert_eq!(
            status_message(Some("zeppelin"), None),
            "The word zeppelin is not in this text"
        );
    }
}

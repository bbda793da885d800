use segcli_core::{
    update, validate_upload, AppState, DataSource, Msg, Severity, UploadError, MAX_UPLOAD_BYTES,
};

#[test]
fn valid_csv_upload_is_stored_with_a_success_notice() {
    let state = AppState::new();
    let (state, _) = update(
        state,
        Msg::FileSelected {
            name: "orders.csv".to_string(),
            size_bytes: 4096,
        },
    );

    assert_eq!(
        state.selection(),
        Some(&DataSource::Upload {
            filename: "orders.csv".to_string(),
            size_bytes: 4096,
        })
    );
    let notice = state.notices().last().unwrap();
    assert_eq!(notice.severity, Severity::Success);
    assert!(notice.text.contains("orders.csv"));
}

#[test]
fn extension_check_is_case_insensitive() {
    let state = AppState::new();
    let (state, _) = update(
        state,
        Msg::FileSelected {
            name: "Q3-EXPORT.XLSX".to_string(),
            size_bytes: 1024,
        },
    );
    assert!(state.selection().is_some());
}

#[test]
fn unsupported_file_type_is_rejected_and_clears_the_selection() {
    let state = AppState::new();
    let (state, _) = update(
        state,
        Msg::SampleSelected {
            name: "ecommerce".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::FileSelected {
            name: "notes.txt".to_string(),
            size_bytes: 10,
        },
    );

    assert!(state.selection().is_none());
    let notice = state.notices().last().unwrap();
    assert_eq!(notice.severity, Severity::Error);
}

#[test]
fn oversized_upload_is_rejected() {
    let state = AppState::new();
    let (state, _) = update(
        state,
        Msg::FileSelected {
            name: "orders.csv".to_string(),
            size_bytes: MAX_UPLOAD_BYTES + 1,
        },
    );

    assert!(state.selection().is_none());
    let notice = state.notices().last().unwrap();
    assert_eq!(notice.severity, Severity::Error);
}

#[test]
fn validate_upload_edge_cases() {
    assert!(validate_upload("data.csv", MAX_UPLOAD_BYTES).is_ok());
    assert!(validate_upload("data.xls", 1).is_ok());
    assert_eq!(
        validate_upload("data", 1),
        Err(UploadError::UnsupportedType {
            filename: "data".to_string(),
        })
    );
    assert_eq!(
        validate_upload("archive.csv.gz", 1),
        Err(UploadError::UnsupportedType {
            filename: "archive.csv.gz".to_string(),
        })
    );
    assert_eq!(
        validate_upload("big.csv", MAX_UPLOAD_BYTES + 1),
        Err(UploadError::TooLarge {
            filename: "big.csv".to_string(),
            size_bytes: MAX_UPLOAD_BYTES + 1,
            limit: MAX_UPLOAD_BYTES,
        })
    );
}

#[test]
fn sample_selection_replaces_a_prior_upload() {
    let state = AppState::new();
    let (state, _) = update(
        state,
        Msg::FileSelected {
            name: "orders.csv".to_string(),
            size_bytes: 4096,
        },
    );
    let (state, _) = update(
        state,
        Msg::SampleSelected {
            name: "ecommerce".to_string(),
        },
    );

    assert_eq!(
        state.selection(),
        Some(&DataSource::Sample {
            name: "ecommerce".to_string(),
        })
    );
}

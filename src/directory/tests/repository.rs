mod get_directory_tests {
    use crate::directory::repository::{get_by_account_and_path, get_by_object_id, save_directory};
    use crate::directory::tests::upsert_request;
    use crate::directory::DirectoryRecord;
    use crate::test::{cleanup, init_db, open_test_connection};

    #[test]
    fn get_by_account_and_path_not_found() {
        init_db();
        let con = open_test_connection();
        let found = get_by_account_and_path("u1", "/a", &con).unwrap();
        con.close().unwrap();
        assert_eq!(None, found);
        cleanup();
    }

    #[test]
    fn get_by_account_and_path_checks_account() {
        init_db();
        let con = open_test_connection();
        save_directory(&DirectoryRecord::from(&upsert_request("u1", "o1", "/a")), &con).unwrap();
        let other_account = get_by_account_and_path("u2", "/a", &con).unwrap();
        let same_account = get_by_account_and_path("u1", "/a", &con).unwrap();
        con.close().unwrap();
        assert_eq!(None, other_account);
        assert_eq!("o1", same_account.unwrap().object_id);
        cleanup();
    }

    #[test]
    fn get_by_object_id_round_trips_every_field() {
        init_db();
        let con = open_test_connection();
        let record = DirectoryRecord {
            object_id: "o1".to_string(),
            account: "u1".to_string(),
            path: "/a".to_string(),
            file_id: "f1".to_string(),
            etag: "e1".to_string(),
            permissions: "RGDNVCK".to_string(),
            is_encrypted: true,
            is_favorite: true,
            is_offline: true,
            offline_synced_at: Some(chrono::Utc::now()),
            rich_workspace: Some("# readme".to_string()),
            color_tag: Some("#ff0000".to_string()),
        };
        save_directory(&record, &con).unwrap();
        let found = get_by_object_id("o1", &con).unwrap();
        con.close().unwrap();
        assert_eq!(Some(record), found);
        cleanup();
    }
}

mod get_subtree_tests {
    use crate::directory::repository::{get_subtree, save_directory};
    use crate::directory::tests::upsert_request;
    use crate::directory::DirectoryRecord;
    use crate::test::{cleanup, init_db, open_test_connection};

    fn save(account: &str, object_id: &str, path: &str, con: &rusqlite::Connection) {
        save_directory(
            &DirectoryRecord::from(&upsert_request(account, object_id, path)),
            con,
        )
        .unwrap();
    }

    #[test]
    fn get_subtree_respects_segment_boundaries() {
        init_db();
        let con = open_test_connection();
        save("u1", "1", "/a", &con);
        save("u1", "2", "/a/b", &con);
        save("u1", "3", "/a/b/c", &con);
        save("u1", "4", "/ab", &con);
        save("u1", "5", "/ab/a", &con);
        save("u2", "6", "/a/b", &con);
        let paths: Vec<String> = get_subtree("u1", "/a", &con)
            .unwrap()
            .into_iter()
            .map(|d| d.path)
            .collect();
        con.close().unwrap();
        assert_eq!(vec!["/a", "/a/b", "/a/b/c"], paths);
        cleanup();
    }

    #[test]
    fn get_subtree_is_case_sensitive() {
        init_db();
        let con = open_test_connection();
        save("u1", "1", "/A/b", &con);
        let found = get_subtree("u1", "/a", &con).unwrap();
        con.close().unwrap();
        assert!(found.is_empty());
        cleanup();
    }

    #[test]
    fn get_subtree_of_root_returns_everything_for_account() {
        init_db();
        let con = open_test_connection();
        save("u1", "1", "/", &con);
        save("u1", "2", "/a", &con);
        save("u1", "3", "/b/c", &con);
        save("u2", "4", "/a", &con);
        let found = get_subtree("u1", "/", &con).unwrap();
        con.close().unwrap();
        assert_eq!(3, found.len());
        cleanup();
    }
}

mod write_directory_tests {
    use crate::directory::repository::{
        get_by_account_and_path, get_by_object_id, move_descendants, save_directory,
        update_observed_attributes, update_path,
    };
    use crate::directory::tests::upsert_request;
    use crate::directory::DirectoryRecord;
    use crate::test::{cleanup, init_db, open_test_connection};

    #[test]
    fn update_observed_attributes_missing_record_updates_nothing() {
        init_db();
        let con = open_test_connection();
        let updated = update_observed_attributes(&upsert_request("u1", "o1", "/a"), &con).unwrap();
        con.close().unwrap();
        assert_eq!(0, updated);
        cleanup();
    }

    #[test]
    fn save_directory_replaces_same_object_id() {
        init_db();
        let con = open_test_connection();
        save_directory(&DirectoryRecord::from(&upsert_request("u1", "o1", "/a")), &con).unwrap();
        save_directory(&DirectoryRecord::from(&upsert_request("u1", "o1", "/b")), &con).unwrap();
        let old = get_by_account_and_path("u1", "/a", &con).unwrap();
        let new = get_by_account_and_path("u1", "/b", &con).unwrap();
        con.close().unwrap();
        assert_eq!(None, old);
        assert!(new.is_some());
        cleanup();
    }

    #[test]
    fn update_path_onto_existing_path_fails() {
        init_db();
        let con = open_test_connection();
        save_directory(&DirectoryRecord::from(&upsert_request("u1", "o1", "/a")), &con).unwrap();
        save_directory(&DirectoryRecord::from(&upsert_request("u1", "o2", "/b")), &con).unwrap();
        let result = update_path("o1", "/b", &con);
        con.close().unwrap();
        assert!(result.is_err());
        cleanup();
    }

    #[test]
    fn move_descendants_keeps_moved_directory_and_siblings() {
        init_db();
        let con = open_test_connection();
        for (object_id, path) in [("1", "/a"), ("2", "/a/b"), ("3", "/a/b/c"), ("4", "/ab")] {
            save_directory(&DirectoryRecord::from(&upsert_request("u1", object_id, path)), &con)
                .unwrap();
        }
        let moved = move_descendants("u1", "/a", "/z/y", &con).unwrap();
        let paths: Vec<String> = ["1", "2", "3", "4"]
            .iter()
            .map(|id| get_by_object_id(id, &con).unwrap().unwrap().path)
            .collect();
        con.close().unwrap();
        assert_eq!(2, moved);
        assert_eq!(vec!["/a", "/z/y/b", "/z/y/b/c", "/ab"], paths);
        cleanup();
    }

    #[test]
    fn move_descendants_of_root_changes_nothing() {
        init_db();
        let con = open_test_connection();
        save_directory(&DirectoryRecord::from(&upsert_request("u1", "1", "/a")), &con).unwrap();
        let moved = move_descendants("u1", "/", "/z", &con).unwrap();
        con.close().unwrap();
        assert_eq!(0, moved);
        cleanup();
    }
}

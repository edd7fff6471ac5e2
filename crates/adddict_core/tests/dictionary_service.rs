use adddict_core::db::open_db_in_memory;
use adddict_core::{
    sqlite_dictionary_service, CoreConfig, CreateDictionaryRequest, DefaultDictionaryMapper,
    DefaultDictionaryValidator, DictionaryAction, DictionaryDto, DictionaryService,
    DictionaryServiceError, DictionaryValidationError, GetDictionaryRequest,
    GetUserDictionariesRequest, GetUserSubscribedDictionariesRequest, SqliteDictionaryRepository,
    SqliteDictionaryService, SubscribeDictionaryRequest, UpdateDictionaryRequest,
};
use rusqlite::Connection;
use std::num::NonZeroU32;
use uuid::Uuid;

fn service(conn: &mut Connection) -> SqliteDictionaryService<'_> {
    service_with_page_size(conn, 10)
}

fn service_with_page_size(conn: &mut Connection, page_size: u32) -> SqliteDictionaryService<'_> {
    let config = CoreConfig {
        dictionaries_page_size: NonZeroU32::new(page_size).unwrap(),
        ..CoreConfig::default()
    };
    sqlite_dictionary_service(conn, &config).unwrap()
}

fn create_request(author_id: i64, name: &str, is_public: bool) -> CreateDictionaryRequest {
    CreateDictionaryRequest {
        author_id,
        name: name.to_string(),
        description: None,
        is_public,
    }
}

fn get_request(id: Uuid, request_sender_id: i64) -> GetDictionaryRequest {
    GetDictionaryRequest {
        id,
        request_sender_id,
    }
}

fn dictionary_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM dictionaries;", [], |row| row.get(0))
        .unwrap()
}

fn ids(dtos: &[DictionaryDto]) -> Vec<Uuid> {
    dtos.iter().map(|dto| dto.id).collect()
}

#[test]
fn create_returns_projection_of_persisted_dictionary() {
    let mut conn = open_db_in_memory().unwrap();
    let service = service(&mut conn);

    let created = service
        .create(&CreateDictionaryRequest {
            author_id: 7,
            name: "  German verbs ".to_string(),
            description: Some("A1 level".to_string()),
            is_public: true,
        })
        .unwrap();
    assert_eq!(created.author_id, 7);
    assert_eq!(created.name, "German verbs");
    assert_eq!(created.description.as_deref(), Some("A1 level"));
    assert!(created.is_public);

    let fetched = service.get(&get_request(created.id, 42)).unwrap();
    assert_eq!(fetched, created);
}

#[test]
fn create_rejects_invalid_request_without_writing() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let service = service(&mut conn);
        let err = service.create(&create_request(7, "   ", false)).unwrap_err();
        assert!(matches!(
            err,
            DictionaryServiceError::Validation(DictionaryValidationError::BlankName)
        ));
    }
    assert_eq!(dictionary_count(&conn), 0);
}

#[test]
fn private_dictionary_lifecycle_for_owner_and_stranger() {
    let mut conn = open_db_in_memory().unwrap();
    let service = service(&mut conn);

    let created = service.create(&create_request(7, "private", false)).unwrap();

    assert!(service.get(&get_request(created.id, 7)).is_ok());
    let err = service.get(&get_request(created.id, 9)).unwrap_err();
    assert!(matches!(
        err,
        DictionaryServiceError::Forbidden {
            action: DictionaryAction::Read,
            ..
        }
    ));

    assert!(service.delete(created.id, 7).unwrap());
    let err = service.get(&get_request(created.id, 7)).unwrap_err();
    assert!(matches!(err, DictionaryServiceError::DictionaryNotFound(id) if id == created.id));
}

#[test]
fn get_missing_dictionary_returns_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let service = service(&mut conn);

    let missing = Uuid::new_v4();
    let err = service.get(&get_request(missing, 1)).unwrap_err();
    assert!(matches!(err, DictionaryServiceError::DictionaryNotFound(id) if id == missing));
}

#[test]
fn owner_update_merges_only_present_fields() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = service(&mut conn);
    let created = service
        .create(&CreateDictionaryRequest {
            author_id: 7,
            name: "verbs".to_string(),
            description: Some("draft".to_string()),
            is_public: false,
        })
        .unwrap();

    let updated = service
        .update(
            created.id,
            &UpdateDictionaryRequest {
                request_sender_id: 7,
                name: Some("strong verbs".to_string()),
                is_public: Some(true),
                ..UpdateDictionaryRequest::default()
            },
        )
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "strong verbs");
    assert_eq!(updated.description.as_deref(), Some("draft"));
    assert!(updated.is_public);
    assert!(updated.updated_at >= created.updated_at);

    let fetched = service.get(&get_request(created.id, 9)).unwrap();
    assert_eq!(fetched, updated);
}

#[test]
fn non_owner_update_is_forbidden_and_writes_nothing() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = service(&mut conn);
    let created = service.create(&create_request(7, "verbs", true)).unwrap();

    let err = service
        .update(
            created.id,
            &UpdateDictionaryRequest {
                request_sender_id: 9,
                name: Some("hijacked".to_string()),
                ..UpdateDictionaryRequest::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        DictionaryServiceError::Forbidden {
            action: DictionaryAction::Update,
            ..
        }
    ));

    let fetched = service.get(&get_request(created.id, 7)).unwrap();
    assert_eq!(fetched, created);
}

#[test]
fn update_of_missing_dictionary_returns_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut service = service(&mut conn);
        let missing = Uuid::new_v4();
        let err = service
            .update(
                missing,
                &UpdateDictionaryRequest {
                    request_sender_id: 7,
                    is_public: Some(true),
                    ..UpdateDictionaryRequest::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, DictionaryServiceError::DictionaryNotFound(id) if id == missing));
    }
    assert_eq!(dictionary_count(&conn), 0);
}

#[test]
fn update_is_validated_before_storage_access() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = service(&mut conn);

    let err = service
        .update(
            Uuid::new_v4(),
            &UpdateDictionaryRequest {
                request_sender_id: 7,
                ..UpdateDictionaryRequest::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        DictionaryServiceError::Validation(DictionaryValidationError::EmptyUpdate)
    ));
}

#[test]
fn non_owner_delete_is_forbidden_and_keeps_row() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let service = service(&mut conn);
        let created = service.create(&create_request(7, "verbs", true)).unwrap();

        let err = service.delete(created.id, 9).unwrap_err();
        assert!(matches!(
            err,
            DictionaryServiceError::Forbidden {
                action: DictionaryAction::Delete,
                ..
            }
        ));

        let missing = Uuid::new_v4();
        let err = service.delete(missing, 7).unwrap_err();
        assert!(matches!(err, DictionaryServiceError::DictionaryNotFound(id) if id == missing));
    }
    assert_eq!(dictionary_count(&conn), 1);
}

#[test]
fn owner_sees_all_dictionaries_and_others_only_public() {
    let mut conn = open_db_in_memory().unwrap();
    let service = service(&mut conn);
    let public = service.create(&create_request(7, "public", true)).unwrap();
    let private = service.create(&create_request(7, "private", false)).unwrap();
    service.create(&create_request(8, "foreign", true)).unwrap();

    let own = service
        .list_owned_or_public(&GetUserDictionariesRequest {
            user_id: 7,
            request_sender_id: 7,
            page: 0,
        })
        .unwrap();
    assert_eq!(own.user_id, 7);
    assert_eq!(ids(&own.page.content), vec![private.id, public.id]);
    assert_eq!(own.page.total_elements, 2);

    let visitor = service
        .list_owned_or_public(&GetUserDictionariesRequest {
            user_id: 7,
            request_sender_id: 9,
            page: 0,
        })
        .unwrap();
    assert_eq!(ids(&visitor.page.content), vec![public.id]);
    assert_eq!(visitor.page.total_elements, 1);
    assert_eq!(visitor.page.page_size, 1);
}

#[test]
fn page_metadata_reports_returned_items_and_total_pages() {
    let mut conn = open_db_in_memory().unwrap();
    let service = service_with_page_size(&mut conn, 10);
    assert_eq!(service.page_size(), 10);
    for idx in 0..25 {
        service
            .create(&create_request(3, &format!("dictionary {idx}"), false))
            .unwrap();
    }

    let request = |page| GetUserDictionariesRequest {
        user_id: 3,
        request_sender_id: 3,
        page,
    };

    let first = service.list_owned_or_public(&request(0)).unwrap().page;
    assert_eq!(first.page, 0);
    assert_eq!(first.page_size, 10);
    assert_eq!(first.total_elements, 25);
    assert_eq!(first.total_pages, 3);

    let last = service.list_owned_or_public(&request(2)).unwrap().page;
    assert_eq!(last.page, 2);
    assert_eq!(last.content.len(), 5);
    assert_eq!(last.page_size, 5);
    assert_eq!(last.total_pages, 3);
}

#[test]
fn smallest_page_size_puts_one_dictionary_on_each_page() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteDictionaryRepository::try_new(&mut conn).unwrap();
    let service = DictionaryService::new(
        repo,
        DefaultDictionaryValidator,
        DefaultDictionaryMapper,
        NonZeroU32::MIN,
    );
    for idx in 0..3 {
        service
            .create(&create_request(3, &format!("dictionary {idx}"), true))
            .unwrap();
    }

    let second = service
        .list_owned_or_public(&GetUserDictionariesRequest {
            user_id: 3,
            request_sender_id: 4,
            page: 1,
        })
        .unwrap()
        .page;
    assert_eq!(second.content.len(), 1);
    assert_eq!(second.total_elements, 3);
    assert_eq!(second.total_pages, 3);
}

#[test]
fn list_rejects_invalid_user_ids() {
    let mut conn = open_db_in_memory().unwrap();
    let service = service(&mut conn);

    let err = service
        .list_subscribed(&GetUserSubscribedDictionariesRequest {
            user_id: 0,
            page: 0,
        })
        .unwrap_err();
    assert!(matches!(
        err,
        DictionaryServiceError::Validation(DictionaryValidationError::InvalidUserId { .. })
    ));
}

#[test]
fn subscribed_list_follows_subscriptions() {
    let mut conn = open_db_in_memory().unwrap();
    let service = service(&mut conn);
    let first = service.create(&create_request(7, "first", true)).unwrap();
    let second = service.create(&create_request(8, "second", true)).unwrap();
    service.create(&create_request(8, "unsubscribed", true)).unwrap();

    let subscribe = |dictionary_id| SubscribeDictionaryRequest {
        dictionary_id,
        user_id: 9,
    };
    assert!(service.subscribe(&subscribe(first.id)).unwrap());
    assert!(service.subscribe(&subscribe(second.id)).unwrap());
    assert!(!service.subscribe(&subscribe(second.id)).unwrap());

    let listed = service
        .list_subscribed(&GetUserSubscribedDictionariesRequest {
            user_id: 9,
            page: 0,
        })
        .unwrap();
    assert_eq!(listed.user_id, 9);
    assert_eq!(listed.page.total_elements, 2);
    let mut listed_ids = ids(&listed.page.content);
    listed_ids.sort();
    let mut expected = vec![first.id, second.id];
    expected.sort();
    assert_eq!(listed_ids, expected);

    assert!(service.unsubscribe(&subscribe(first.id)).unwrap());
    let listed = service
        .list_subscribed(&GetUserSubscribedDictionariesRequest {
            user_id: 9,
            page: 0,
        })
        .unwrap();
    assert_eq!(ids(&listed.page.content), vec![second.id]);
}

#[test]
fn subscribing_to_foreign_private_dictionary_is_forbidden() {
    let mut conn = open_db_in_memory().unwrap();
    let service = service(&mut conn);
    let private = service.create(&create_request(7, "private", false)).unwrap();

    let err = service
        .subscribe(&SubscribeDictionaryRequest {
            dictionary_id: private.id,
            user_id: 9,
        })
        .unwrap_err();
    assert!(matches!(
        err,
        DictionaryServiceError::Forbidden {
            action: DictionaryAction::Subscribe,
            ..
        }
    ));

    let missing = Uuid::new_v4();
    let err = service
        .subscribe(&SubscribeDictionaryRequest {
            dictionary_id: missing,
            user_id: 9,
        })
        .unwrap_err();
    assert!(matches!(err, DictionaryServiceError::DictionaryNotFound(id) if id == missing));
}

#[test]
fn deleted_dictionary_disappears_from_subscribers() {
    let mut conn = open_db_in_memory().unwrap();
    let service = service(&mut conn);
    let shared = service.create(&create_request(7, "shared", true)).unwrap();
    service
        .subscribe(&SubscribeDictionaryRequest {
            dictionary_id: shared.id,
            user_id: 9,
        })
        .unwrap();

    service.delete(shared.id, 7).unwrap();

    let listed = service
        .list_subscribed(&GetUserSubscribedDictionariesRequest {
            user_id: 9,
            page: 0,
        })
        .unwrap();
    assert!(listed.page.content.is_empty());
    assert_eq!(listed.page.total_pages, 0);
}

#[test]
fn dto_serializes_with_camel_case_fields() {
    let mut conn = open_db_in_memory().unwrap();
    let service = service(&mut conn);
    let created = service.create(&create_request(7, "verbs", true)).unwrap();

    let json = serde_json::to_value(&created).unwrap();
    assert_eq!(json["authorId"], 7);
    assert_eq!(json["isPublic"], true);

    let request: GetUserDictionariesRequest =
        serde_json::from_str(r#"{ "userId": 7, "requestSenderId": 9 }"#).unwrap();
    assert_eq!(request.page, 0);
}

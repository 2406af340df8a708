use chrono::NaiveDate;
use minato_core::market::entity::MarketRecord;
use minato_core::store::error::StoreError;
use minato_core::store::port::{
    DatasetStore, MarketRecordStore, NewAdminRecord, NewDryBulkRecord, NewTankerRecord, NewUser,
    Role, SystemStore, TankerRecordUpdate,
};
use minato_store::config::set_root_dir;
use minato_store::dataset::SqliteDatasetStore;
use minato_store::market::SqliteMarketStore;
use minato_store::system::SqliteSystemStore;
use tempfile::tempdir;

#[tokio::test]
async fn test_store_full_integration() {
    // 1. 初始化临时测试环境
    let tmp_dir = tempdir().expect("Failed to create temp dir");
    let root_path = tmp_dir.path().to_path_buf();
    set_root_dir(root_path.clone());

    // 2. 测试 SqliteSystemStore
    let system_store = SqliteSystemStore::new()
        .await
        .expect("Failed to create system store");

    // 账户创建与读取
    let admin = system_store
        .create_user(&NewUser {
            username: "ops_admin".to_string(),
            password_hash: "$2b$12$fakehash".to_string(),
            role: Role::Admin,
        })
        .await
        .unwrap();
    assert!(admin.id > 0);
    assert_eq!(admin.role, Role::Admin);

    let by_id = system_store
        .get_user(admin.id)
        .await
        .unwrap()
        .expect("User should exist");
    assert_eq!(by_id.username, "ops_admin");

    let by_name = system_store
        .get_user_by_username("ops_admin")
        .await
        .unwrap()
        .expect("User should exist");
    assert_eq!(by_name.id, admin.id);
    assert_eq!(by_name.role, Role::Admin);

    // 用户名唯一性：重名必须返回 Conflict
    let dup = system_store
        .create_user(&NewUser {
            username: "ops_admin".to_string(),
            password_hash: "$2b$12$otherhash".to_string(),
            role: Role::ViewerTanker,
        })
        .await;
    assert!(matches!(dup, Err(StoreError::Conflict(_))));

    // 分页：再建两个账户后 skip/limit 生效,total 始终为全表数
    for (name, role) in [
        ("viewer_t", Role::ViewerTanker),
        ("viewer_d", Role::ViewerDryBulk),
    ] {
        system_store
            .create_user(&NewUser {
                username: name.to_string(),
                password_hash: "$2b$12$fakehash".to_string(),
                role,
            })
            .await
            .unwrap();
    }
    let page = system_store.list_users(0, 2).await.unwrap();
    assert_eq!(page.users.len(), 2);
    assert_eq!(page.total, 3);
    let page2 = system_store.list_users(2, 2).await.unwrap();
    assert_eq!(page2.users.len(), 1);
    assert_eq!(page2.total, 3);

    // 删除返回被删实体,重复删除返回 NotFound
    let deleted = system_store.delete_user(admin.id).await.unwrap();
    assert_eq!(deleted.username, "ops_admin");
    let gone = system_store.delete_user(admin.id).await;
    assert!(matches!(gone, Err(StoreError::NotFound)));
    assert!(system_store.get_user(admin.id).await.unwrap().is_none());

    // 3. 测试 SqliteDatasetStore
    let dataset_store = SqliteDatasetStore::new()
        .await
        .expect("Failed to create dataset store");

    // 油轮域完整走读
    let tanker = dataset_store
        .create_tanker(&NewTankerRecord {
            name: "Pacific Glory".to_string(),
            capacity: 120_000.0,
            vessel_type: "VLCC".to_string(),
        })
        .await
        .unwrap();
    assert!(tanker.id > 0);

    let tankers = dataset_store.list_tankers().await.unwrap();
    assert_eq!(tankers.len(), 1);
    assert_eq!(tankers[0].name, "Pacific Glory");

    // 稀疏更新：只改 capacity,其余字段必须保持原值
    let patched = dataset_store
        .update_tanker(
            tanker.id,
            &TankerRecordUpdate {
                capacity: Some(130_000.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(patched.capacity, 130_000.0);
    assert_eq!(patched.name, "Pacific Glory");
    assert_eq!(patched.vessel_type, "VLCC");

    // 全空补丁是无操作,返回当前行
    let unchanged = dataset_store
        .update_tanker(tanker.id, &TankerRecordUpdate::default())
        .await
        .unwrap();
    assert_eq!(unchanged.capacity, 130_000.0);
    assert_eq!(unchanged.name, "Pacific Glory");

    // 不存在的目标返回 NotFound
    let missing = dataset_store
        .update_tanker(9999, &TankerRecordUpdate::default())
        .await;
    assert!(matches!(missing, Err(StoreError::NotFound)));

    let removed = dataset_store.delete_tanker(tanker.id).await.unwrap();
    assert_eq!(removed.id, tanker.id);
    assert!(dataset_store.list_tankers().await.unwrap().is_empty());

    // 干散货域与管理域各走一遍创建/列表
    let bulk = dataset_store
        .create_dry_bulk(&NewDryBulkRecord {
            name: "Iron Duke".to_string(),
            weight: 82_000.0,
            cargo_type: "iron ore".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(dataset_store.list_dry_bulk().await.unwrap().len(), 1);
    let removed_bulk = dataset_store.delete_dry_bulk(bulk.id).await.unwrap();
    assert_eq!(removed_bulk.cargo_type, "iron ore");

    let note = dataset_store
        .create_admin_record(&NewAdminRecord {
            admin_name: "ops".to_string(),
            data: "quarterly audit".to_string(),
        })
        .await
        .unwrap();
    let records = dataset_store.list_admin_records().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].admin_name, "ops");
    dataset_store.delete_admin_record(note.id).await.unwrap();

    // 4. 测试 SqliteMarketStore
    let market_store = SqliteMarketStore::new()
        .await
        .expect("Failed to create market store");

    // 验证物理路径 (应当在临时目录下)
    assert!(root_path.join("market.db").exists());

    let record = MarketRecord {
        id: "A1".to_string(),
        name: "Brent".to_string(),
        group: "oil".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        value: 80,
    };
    market_store.upsert_record(&record).await.unwrap();

    let loaded = market_store
        .get_record("A1")
        .await
        .unwrap()
        .expect("Record should exist");
    assert_eq!(loaded.name, "Brent");
    assert_eq!(loaded.group, "oil");
    assert_eq!(loaded.value, 80);
    assert_eq!(loaded.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

    // 同一外部 ID 重复写入：整行覆盖,不新增行
    let updated = MarketRecord {
        value: 85,
        ..record.clone()
    };
    market_store.upsert_record(&updated).await.unwrap();

    let all = market_store.list_records().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].value, 85);
}

mod common;

use anyhow::Result;
use sqlx::PgPool;

use todo_api::database::models::{NewItem, NewList, NewUser, UpdateItemData, UpdateListData};
use todo_api::database::{DatabaseError, Repository};

async fn count_lists_titled(pool: &PgPool, title: &str) -> Result<i64> {
    Ok(sqlx::query_scalar("SELECT COUNT(*) FROM todo_lists WHERE title = $1")
        .bind(title)
        .fetch_one(pool)
        .await?)
}

async fn count_items_titled(pool: &PgPool, title: &str) -> Result<i64> {
    Ok(sqlx::query_scalar("SELECT COUNT(*) FROM todo_items WHERE title = $1")
        .bind(title)
        .fetch_one(pool)
        .await?)
}

async fn new_user(repo: &Repository, prefix: &str) -> Result<i32> {
    let username = common::unique(prefix);
    let user = repo
        .users
        .create_user(NewUser {
            name: prefix.to_string(),
            username,
            password_hash: "not-a-real-hash".to_string(),
        })
        .await?;
    Ok(user.id)
}

#[tokio::test]
async fn failed_ownership_insert_rolls_back_the_list() -> Result<()> {
    let Some(pool) = common::test_pool().await? else { return Ok(()) };
    let repo = Repository::postgres(pool.clone());
    let marker = common::unique("orphan-list");

    // No such user: the users_lists foreign key rejects the join row
    let result = repo
        .lists
        .create_list(
            -1,
            NewList {
                title: marker.clone(),
                description: String::new(),
            },
        )
        .await;

    assert!(result.is_err());
    assert_eq!(count_lists_titled(&pool, &marker).await?, 0);
    Ok(())
}

#[tokio::test]
async fn failed_containment_insert_rolls_back_the_item() -> Result<()> {
    let Some(pool) = common::test_pool().await? else { return Ok(()) };
    let repo = Repository::postgres(pool.clone());
    let marker = common::unique("orphan-item");

    let result = repo
        .items
        .create_item(
            -1,
            NewItem {
                title: marker.clone(),
                description: String::new(),
            },
        )
        .await;

    assert!(result.is_err());
    assert_eq!(count_items_titled(&pool, &marker).await?, 0);
    Ok(())
}

#[tokio::test]
async fn duplicate_username_is_a_unique_violation() -> Result<()> {
    let Some(pool) = common::test_pool().await? else { return Ok(()) };
    let repo = Repository::postgres(pool);
    let username = common::unique("dup");

    let user = NewUser {
        name: "Dup".to_string(),
        username,
        password_hash: "hash".to_string(),
    };
    repo.users.create_user(user.clone()).await?;
    let err = repo.users.create_user(user).await.unwrap_err();

    assert!(matches!(err, DatabaseError::UniqueViolation(_)));
    Ok(())
}

#[tokio::test]
async fn reads_are_scoped_to_the_owner() -> Result<()> {
    let Some(pool) = common::test_pool().await? else { return Ok(()) };
    let repo = Repository::postgres(pool);
    let alice = new_user(&repo, "alice").await?;
    let bob = new_user(&repo, "bob").await?;

    let list = repo
        .lists
        .create_list(
            alice,
            NewList {
                title: "Groceries".to_string(),
                description: String::new(),
            },
        )
        .await?;

    assert_eq!(repo.lists.list_by_id(alice, list.id).await?, Some(list.clone()));
    assert_eq!(repo.lists.list_by_id(bob, list.id).await?, None);
    assert_eq!(repo.lists.all_lists(alice).await?, vec![list]);
    assert!(repo.lists.all_lists(bob).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn partial_updates_leave_other_columns_alone() -> Result<()> {
    let Some(pool) = common::test_pool().await? else { return Ok(()) };
    let repo = Repository::postgres(pool);
    let owner = new_user(&repo, "updater").await?;

    let list = repo
        .lists
        .create_list(
            owner,
            NewList {
                title: "Work".to_string(),
                description: "weekday".to_string(),
            },
        )
        .await?;

    let updated = repo
        .lists
        .update_list(
            list.id,
            &UpdateListData {
                title: None,
                description: Some("weekend".to_string()),
            },
        )
        .await?;
    assert_eq!(updated.title, "Work");
    assert_eq!(updated.description, "weekend");

    let empty = repo.lists.update_list(list.id, &UpdateListData::default()).await;
    assert!(matches!(empty, Err(DatabaseError::EmptyUpdate)));

    let item = repo
        .items
        .create_item(
            list.id,
            NewItem {
                title: "Report".to_string(),
                description: String::new(),
            },
        )
        .await?;
    assert!(!item.done);

    let done = repo
        .items
        .update_item(
            item.id,
            &UpdateItemData {
                done: Some(true),
                ..Default::default()
            },
        )
        .await?;
    assert!(done.done);
    assert_eq!(done.title, "Report");
    Ok(())
}

#[tokio::test]
async fn deleting_a_list_takes_its_items_along() -> Result<()> {
    let Some(pool) = common::test_pool().await? else { return Ok(()) };
    let repo = Repository::postgres(pool.clone());
    let owner = new_user(&repo, "deleter").await?;
    let marker = common::unique("doomed-item");

    let list = repo
        .lists
        .create_list(
            owner,
            NewList {
                title: "Temporary".to_string(),
                description: String::new(),
            },
        )
        .await?;
    let item = repo
        .items
        .create_item(
            list.id,
            NewItem {
                title: marker.clone(),
                description: String::new(),
            },
        )
        .await?;

    repo.lists.delete_list(list.id).await?;

    assert_eq!(repo.lists.list_by_id(owner, list.id).await?, None);
    assert_eq!(repo.items.item_by_id(list.id, item.id).await?, None);
    assert_eq!(count_items_titled(&pool, &marker).await?, 0);
    Ok(())
}

#[tokio::test]
async fn titles_longer_than_255_characters_are_accepted() -> Result<()> {
    let Some(pool) = common::test_pool().await? else { return Ok(()) };
    let repo = Repository::postgres(pool.clone());
    let owner = new_user(&repo, "verbose").await?;
    let title = format!("{}-{}", common::unique("long-title"), "t".repeat(300));

    let list = repo
        .lists
        .create_list(
            owner,
            NewList {
                title: title.clone(),
                description: String::new(),
            },
        )
        .await?;

    assert_eq!(list.title, title);
    assert_eq!(count_lists_titled(&pool, &title).await?, 1);
    Ok(())
}

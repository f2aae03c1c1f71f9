//! Sign-up and login.

mod common;

use fake::faker::internet::en::Username;
use fake::Fake;

use ticket_booking::{models::SignUp, Error};

fn sign_up_request() -> SignUp {
    let username: String = Username().fake();
    let phone: String = format!("08{}", (100_000_000u64..999_999_999).fake::<u64>());
    SignUp {
        username,
        password: "secret".to_string(),
        phone,
    }
}

#[tokio::test]
async fn registered_user_can_log_in() {
    let app = common::app().await;
    let accounts = &app.state.accounts;

    let request = sign_up_request();
    let user = accounts.sign_up(request.clone()).await.unwrap();
    assert_eq!(user.username, request.username);

    assert!(accounts.login(&request.username, "secret").await.unwrap());
    assert!(!accounts.login(&request.username, "wrong").await.unwrap());
    assert!(!accounts.login("nobody", "secret").await.unwrap());

    let found = accounts.find_by_username(&request.username).await.unwrap().unwrap();
    assert_eq!(found.id, user.id);
    assert_eq!(found.phone, request.phone);
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let app = common::app().await;
    let accounts = &app.state.accounts;

    let request = sign_up_request();
    accounts.sign_up(request.clone()).await.unwrap();

    let mut again = sign_up_request();
    again.username = request.username.clone();
    assert!(matches!(
        accounts.sign_up(again).await,
        Err(Error::UsernameTaken(name)) if name == request.username
    ));
}

#[tokio::test]
async fn sign_up_input_is_validated() {
    let app = common::app().await;
    let accounts = &app.state.accounts;

    let mut empty_name = sign_up_request();
    empty_name.username.clear();
    assert!(matches!(accounts.sign_up(empty_name).await, Err(Error::InvalidSignUp(_))));

    let mut short_phone = sign_up_request();
    short_phone.phone = "123".to_string();
    assert!(matches!(accounts.sign_up(short_phone).await, Err(Error::InvalidSignUp(_))));
}

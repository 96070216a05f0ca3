//! Infrastructure services

mod resource_service;
mod views;

pub use resource_service::{
    CreateBlogRequest, RegisterUserRequest, ResourceService, UpdateBlogRequest,
};
pub use views::{BlogStatsView, BlogView, LoginView, OwnedBlogView, OwnerView, UserView};

//! The eight content domains and their canonical orderings.

use std::cmp::Ordering;

use super::ContentDomain;
use crate::backend::{BackendClient, Order};
use crate::models::{
    BlogPost, BlogPostDraft, Category, CategoryDraft, Project, ProjectDraft, Publication,
    PublicationDraft, ResearchProject, ResearchProjectDraft, Service, ServiceDraft, SiteSetting,
    SiteSettingDraft, Testimonial, TestimonialDraft,
};

/// AI projects, by manual sort order.
#[derive(Debug, Clone, Copy)]
pub struct Projects;

impl ContentDomain for Projects {
    const NAME: &'static str = "projects";
    const TABLE: &'static str = "ai_projects";
    const ORDER: &'static [Order] = &[Order::asc("sort_order")];

    type Record = Project;
    type Draft = ProjectDraft;

    fn compare(a: &Project, b: &Project) -> Ordering {
        a.sort_order.cmp(&b.sort_order)
    }
}

/// Research lines, by manual sort order.
#[derive(Debug, Clone, Copy)]
pub struct ResearchProjects;

impl ContentDomain for ResearchProjects {
    const NAME: &'static str = "research";
    const TABLE: &'static str = "research_projects";
    const ORDER: &'static [Order] = &[Order::asc("sort_order")];

    type Record = ResearchProject;
    type Draft = ResearchProjectDraft;

    fn compare(a: &ResearchProject, b: &ResearchProject) -> Ordering {
        a.sort_order.cmp(&b.sort_order)
    }
}

/// Publications, newest year first.
#[derive(Debug, Clone, Copy)]
pub struct Publications;

impl ContentDomain for Publications {
    const NAME: &'static str = "publications";
    const TABLE: &'static str = "publications";
    const ORDER: &'static [Order] = &[Order::desc("year")];

    type Record = Publication;
    type Draft = PublicationDraft;

    fn compare(a: &Publication, b: &Publication) -> Ordering {
        b.year.cmp(&a.year)
    }
}

/// Blog posts, newest first, with their category embedded.
#[derive(Debug, Clone, Copy)]
pub struct BlogPosts;

impl ContentDomain for BlogPosts {
    const NAME: &'static str = "blog";
    const TABLE: &'static str = "blog_posts";
    const ORDER: &'static [Order] = &[Order::desc("created_at")];

    type Record = BlogPost;
    type Draft = BlogPostDraft;

    fn compare(a: &BlogPost, b: &BlogPost) -> Ordering {
        b.created_at.cmp(&a.created_at)
    }

    fn columns(client: &BackendClient) -> String {
        format!("*,category:{}(*)", client.table(Categories::TABLE))
    }
}

/// Offered services, by manual sort order.
#[derive(Debug, Clone, Copy)]
pub struct Services;

impl ContentDomain for Services {
    const NAME: &'static str = "services";
    const TABLE: &'static str = "services";
    const ORDER: &'static [Order] = &[Order::asc("sort_order")];

    type Record = Service;
    type Draft = ServiceDraft;

    fn compare(a: &Service, b: &Service) -> Ordering {
        a.sort_order.cmp(&b.sort_order)
    }
}

/// Blog categories, alphabetically.
#[derive(Debug, Clone, Copy)]
pub struct Categories;

impl ContentDomain for Categories {
    const NAME: &'static str = "categories";
    const TABLE: &'static str = "content_categories";
    const ORDER: &'static [Order] = &[Order::asc("name")];

    type Record = Category;
    type Draft = CategoryDraft;

    fn compare(a: &Category, b: &Category) -> Ordering {
        a.name.cmp(&b.name)
    }
}

/// Site settings, grouped by category.
#[derive(Debug, Clone, Copy)]
pub struct Settings;

impl ContentDomain for Settings {
    const NAME: &'static str = "settings";
    const TABLE: &'static str = "site_settings";
    const ORDER: &'static [Order] = &[Order::asc("category")];

    type Record = SiteSetting;
    type Draft = SiteSettingDraft;

    fn compare(a: &SiteSetting, b: &SiteSetting) -> Ordering {
        a.category.cmp(&b.category)
    }
}

/// Testimonials, by manual sort order.
#[derive(Debug, Clone, Copy)]
pub struct Testimonials;

impl ContentDomain for Testimonials {
    const NAME: &'static str = "testimonials";
    const TABLE: &'static str = "testimonials";
    const ORDER: &'static [Order] = &[Order::asc("sort_order")];

    type Record = Testimonial;
    type Draft = TestimonialDraft;

    fn compare(a: &Testimonial, b: &Testimonial) -> Ordering {
        a.sort_order.cmp(&b.sort_order)
    }
}

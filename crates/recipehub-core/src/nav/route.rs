use std::fmt;

use url::form_urlencoded;

/// A location in the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// Recipe listing; `page` starts at 1
    Home { page: u32, query: String },
    RecipeDetail(String),
    CreateRecipe,
    EditRecipe(String),
    Login,
    Register,
}

impl Default for Route {
    fn default() -> Self {
        Self::home()
    }
}

impl Route {
    pub fn home() -> Self {
        Route::Home {
            page: 1,
            query: String::new(),
        }
    }

    /// Parse a client path. Anything unrecognized lands on the listing.
    pub fn parse(path: &str) -> Self {
        let (path, query) = path.split_once('?').unwrap_or((path, ""));
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::parse_home_query(query),
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["recipes", "create"] => Route::CreateRecipe,
            ["recipes", id] => Route::RecipeDetail((*id).to_string()),
            ["recipes", id, "edit"] => Route::EditRecipe((*id).to_string()),
            _ => Self::home(),
        }
    }

    fn parse_home_query(query: &str) -> Self {
        let mut page = 1;
        let mut search = String::new();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "page" => {
                    page = value.parse::<u32>().ok().filter(|p| *p > 0).unwrap_or(1);
                }
                "q" => search = value.into_owned(),
                _ => {}
            }
        }
        Route::Home {
            page,
            query: search,
        }
    }

    /// Canonical path for this route.
    pub fn path(&self) -> String {
        match self {
            Route::Home { page, query } => {
                let mut params = form_urlencoded::Serializer::new(String::new());
                if *page > 1 {
                    params.append_pair("page", &page.to_string());
                }
                if !query.is_empty() {
                    params.append_pair("q", query);
                }
                let params = params.finish();
                if params.is_empty() {
                    "/".to_string()
                } else {
                    format!("/?{}", params)
                }
            }
            Route::RecipeDetail(id) => format!("/recipes/{}", id),
            Route::CreateRecipe => "/recipes/create".to_string(),
            Route::EditRecipe(id) => format!("/recipes/{}/edit", id),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
        }
    }

    /// Routes that need a signed-in user
    pub fn is_guarded(&self) -> bool {
        matches!(self, Route::CreateRecipe | Route::EditRecipe(_))
    }

    /// Routes only meaningful to a signed-out user
    pub fn is_auth_page(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home { .. } => "Recipes",
            Route::RecipeDetail(_) => "Recipe",
            Route::CreateRecipe => "New Recipe",
            Route::EditRecipe(_) => "Edit Recipe",
            Route::Login => "Login",
            Route::Register => "Register",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_route_table() {
        assert_eq!(Route::parse("/"), Route::home());
        assert_eq!(Route::parse(""), Route::home());
        assert_eq!(Route::parse("/login"), Route::Login);
        assert_eq!(Route::parse("/register/"), Route::Register);
        assert_eq!(Route::parse("/recipes/42"), Route::RecipeDetail("42".to_string()));
        assert_eq!(Route::parse("/recipes/42/edit"), Route::EditRecipe("42".to_string()));
    }

    #[test]
    fn test_create_wins_over_detail() {
        assert_eq!(Route::parse("/recipes/create"), Route::CreateRecipe);
    }

    #[test]
    fn test_unknown_paths_fall_back_to_home() {
        assert_eq!(Route::parse("/nope"), Route::home());
        assert_eq!(Route::parse("/recipes"), Route::home());
        assert_eq!(Route::parse("/recipes/1/edit/more"), Route::home());
    }

    #[test]
    fn test_home_query() {
        assert_eq!(
            Route::parse("/?page=3&q=tomato+soup"),
            Route::Home {
                page: 3,
                query: "tomato soup".to_string()
            }
        );
        assert_eq!(Route::parse("/?page=0"), Route::home());
        assert_eq!(Route::parse("/?page=abc"), Route::home());
    }

    #[test]
    fn test_path_round_trip() {
        let routes = [
            Route::home(),
            Route::Home {
                page: 2,
                query: "mac & cheese".to_string(),
            },
            Route::RecipeDetail("abc".to_string()),
            Route::CreateRecipe,
            Route::EditRecipe("7".to_string()),
            Route::Login,
            Route::Register,
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), route);
        }
        assert_eq!(Route::home().path(), "/");
    }

    #[test]
    fn test_guarded_routes() {
        assert!(Route::CreateRecipe.is_guarded());
        assert!(Route::EditRecipe("1".to_string()).is_guarded());
        assert!(!Route::RecipeDetail("1".to_string()).is_guarded());
        assert!(!Route::home().is_guarded());
        assert!(!Route::Login.is_guarded());
    }
}

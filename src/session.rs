//! Authenticated AirlineMogul session.
//!
//! Owns the browser for the lifetime of the run and carries the three
//! endpoints the workflow touches. All navigation goes through here; the
//! selection and query steps only ever see the [`Dom`].

use std::time::Duration;

use tracing::{info, warn};

use crate::browser::{wait_until, BrowserHandle, Dom};
use crate::config::Config;
use crate::error::{HarvestError, Result};

const URL_HOME: &str = "https://www.airlinemogul.com/index.php";
const URL_WORLD: &str = "https://www.airlinemogul.com/select_world.php?id=";
const URL_ROUTES: &str = "https://www.airlinemogul.com/research_route.php";

/// How long to wait for a landmark element proving a page rendered.
const LANDMARK_WAIT: Duration = Duration::from_secs(15);

pub struct Session {
    handle: BrowserHandle,
    dom: Dom,
}

impl Session {
    /// Launch the browser and open the login page. No credentials sent yet.
    pub async fn open(config: &Config) -> Result<Self> {
        let (handle, page) = BrowserHandle::launch(config, URL_HOME).await?;
        Ok(Self {
            handle,
            dom: Dom::new(page),
        })
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    /// Log in and verify it took.
    ///
    /// The site gives no explicit failure signal; a bad password
    /// just re-renders the login form. We therefore treat "the world list
    /// never appeared" as an authentication failure rather than letting a
    /// later step die on a missing control.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<()> {
        info!("logging in as {}", username);
        self.dom.fill_input_by_name("username", username).await?;
        self.dom.fill_input_by_name("password", password).await?;
        self.dom.click_by_name("Login").await?;

        let landmark = "//a[contains(@href, 'select_world.php')]";
        let dom = &self.dom;
        wait_until("post-login world list", LANDMARK_WAIT, || async move {
            Ok(dom.xpath_present(landmark).await?.then_some(()))
        })
        .await
        .map_err(|e| match e {
            HarvestError::Timeout { .. } => HarvestError::Authentication {
                username: username.to_string(),
                reason: "world list did not appear after login".to_string(),
            },
            other => other,
        })?;

        info!("login confirmed");
        Ok(())
    }

    /// Enter the given world.
    ///
    /// The landmark is the page heading that interpolates the world id
    /// ("PW#<id>. <airline>"). A miss here is logged and tolerated; the next
    /// navigation will fail loudly if the world really did not load.
    pub async fn select_world(&self, world_id: &str) -> Result<()> {
        let url = format!("{}{}", URL_WORLD, world_id);
        self.dom.goto(&url).await?;

        let landmark = format!("//h2[contains(text(), 'PW#{}')]", world_id);
        let dom = &self.dom;
        let wait = wait_until(
            &format!("world {} heading", world_id),
            LANDMARK_WAIT,
            || {
                let landmark = landmark.clone();
                async move { Ok(dom.xpath_present(&landmark).await?.then_some(())) }
            },
        )
        .await;

        match wait {
            Ok(()) => info!("world {} selected", world_id),
            Err(e) if e.is_timeout() => warn!("{} (continuing anyway)", e),
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Open the route research form.
    pub async fn go_to_routes(&self) -> Result<()> {
        self.dom.goto(URL_ROUTES).await?;
        Ok(())
    }

    /// Release the browser. Must run on every exit path.
    pub async fn close(self) {
        self.handle.shutdown().await;
    }
}

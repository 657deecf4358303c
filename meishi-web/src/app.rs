//! Meishi Web App - Leptos Frontend

use leptos::prelude::*;

use crate::components::Navbar;
use crate::state::web3::provide_web3_context;

#[component]
pub fn App() -> impl IntoView {
    provide_web3_context();

    view! {
        <div class="app-container">
            <Navbar/>
        </div>
    }
}

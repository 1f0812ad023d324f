pub mod dbfixtures;
